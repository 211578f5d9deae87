use html_escape::{encode_double_quoted_attribute, encode_text};

/// The values shown in a download widget.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetContext {
    /// Link to the attached file.
    pub file_url: String,
    /// URL of the rendered icon.
    pub icon_url: String,
    /// Display name of the file.
    pub name: String,
    /// Human readable file size.
    pub size: String,
    /// ISO 8601 modification date.
    pub date: String,
    /// The tag body, already converted to HTML.
    pub description_html: String,
}

/// Renders the download widget as a single line of HTML.  Every value
/// except the description is escaped; the description is joined onto one
/// line with leading indentation removed.
pub fn render_widget(context: &WidgetContext) -> String {
    format!("<div class=\"download\">\
             <div class=\"dlicon\">\
             <a href=\"{file_url}\" class=\"dllink\"><img src=\"{icon_url}\"></a>\
             <div class=\"dlsize\">{size}</div>\
             </div>\
             <div class=\"dlinfo\">\
             <h2><a href=\"{file_url}\" class=\"dllink\">{name}</a></h2>\
             <div class=\"dldate\">{date}</div>\
             <div class=\"dldesc\">{description}</div>\
             </div>\
             </div>",
            file_url = encode_double_quoted_attribute(&context.file_url),
            icon_url = encode_double_quoted_attribute(&context.icon_url),
            size = encode_text(&context.size),
            name = encode_text(&context.name),
            date = encode_text(&context.date),
            description = single_line(&context.description_html))
}

fn single_line(html: &str) -> String {
    html.lines().map(str::trim_start).collect()
}
