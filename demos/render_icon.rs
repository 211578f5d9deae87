use attachment_icon::attachment::{IconCache, Stored};
use attachment_icon::{IconRenderer, IconRequest, IconSource};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 5 {
        println!("Usage: render_icon <file-or-type> <out-dir> [<size> [<format>]]");
        return;
    }
    let target = &args[1];
    let source = if Path::new(target).exists() {
        IconSource::FilePath(Path::new(target).to_path_buf())
    } else {
        IconSource::FileTypeClass(target.clone())
    };
    let size: f64 = args.get(3)
        .map(|size| size.parse().expect("size must be a number"))
        .unwrap_or(64.0);
    let format = args.get(4).map(String::as_str).unwrap_or("png");
    let request = IconRequest::new(source)
        .with_size(size)
        .with_format(format)
        .with_strict_mode(true)
        .with_display_name(target);

    let renderer = IconRenderer::system();
    let icon = renderer.render(&request).expect("failed to render icon");
    let cache = IconCache::new(&args[2], "");
    match cache.store(&icon).expect("failed to store icon") {
        Stored::Written => println!("Wrote {}", cache.path_for(icon.name()).display()),
        Stored::AlreadyPresent => {
            println!("{} is already present", cache.path_for(icon.name()).display())
        }
        Stored::Skipped => println!("No icon for {}", target),
    }
}
