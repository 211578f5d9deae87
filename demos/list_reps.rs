use attachment_icon::RawIcon;
use std::env;

fn main() {
    env_logger::init();
    if env::args().count() != 2 {
        println!("Usage: list_reps <path>");
        return;
    }
    let path = env::args().nth(1).unwrap();
    let raw = RawIcon::open(&path).expect("failed to read icon");
    println!("{} contains {} representation(s).", path, raw.len());
    for (index, rep) in raw.representations().iter().enumerate() {
        println!("Representation {}: {}x{} pt, {}x{} px, {} samples/pixel{}",
                 index,
                 rep.width(),
                 rep.height(),
                 rep.pixel_width(),
                 rep.pixel_height(),
                 rep.samples_per_pixel(),
                 if rep.has_alpha() { " with alpha" } else { "" });
    }
}
