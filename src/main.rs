// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod canvas;
mod color;
mod config;
mod display;
mod filter;
mod geometry;
mod image;

use canvas::{Canvas, Composite};
use color::Color;
use config::Scene;
use display::{Display, InputEvent, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use geometry::{Point, Rect};
use image::Image;
use sdl2::keyboard::Keycode;

struct Options {
    width: u32,
    height: u32,
    vsync: bool,
    scene_path: Option<String>,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        scene_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => opts.vsync = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        opts.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        opts.height = h;
                    }
                    i += 1;
                }
            },
            "--scene" | "-s" => {
                if i + 1 < args.len() {
                    opts.scene_path = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: softraster [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --width W, -w W       Set window width (default: {})", DEFAULT_WIDTH);
                println!("  --height H, -h H      Set window height (default: {})", DEFAULT_HEIGHT);
                println!("  --scene PATH, -s PATH Load a JSON scene description");
                println!("  --no-vsync            Uncapped framerate");
                println!("  --help                Show this help");
                std::process::exit(0);
            },
            other => {
                eprintln!("Unknown option: {} (try --help)", other);
                std::process::exit(1);
            },
        }
        i += 1;
    }

    opts
}

/// Fallback frame when the scene has no sprites: exercise every primitive
fn draw_primitives_demo(canvas: &mut Canvas) {
    let white = Color::WHITE;

    canvas.draw_line_list(
        &[
            Point::new(40, 500),
            Point::new(120, 430),
            Point::new(200, 520),
            Point::new(280, 440),
        ],
        Color::rgb(255, 200, 0),
    );
    canvas.draw_triangle(Point::new(10, 250), Point::new(10, 400), Point::new(200, 400), white);
    canvas.draw_rect(Rect::new(10, 30, 300, 200), Color::rgb(60, 60, 220));
    canvas.draw_circle(Point::new(500, 400), 100, white);
    canvas.draw_line(Point::new(350, 50), Point::new(750, 250), Color::rgb(255, 0, 80));
}

fn main() -> Result<(), String> {
    env_logger::init();

    let opts = parse_args();
    let mut scene = match &opts.scene_path {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };
    // CLI resolution wins over the scene's
    if opts.width != DEFAULT_WIDTH || opts.height != DEFAULT_HEIGHT {
        scene.width = opts.width;
        scene.height = opts.height;
    }
    log::info!("scene '{}' at {}x{}", scene.name, scene.width, scene.height);

    // Decode every sprite up front; a bad file skips that sprite, not the run
    let mut sprites: Vec<(Image, Point, Composite)> = Vec::new();
    for sprite in &scene.sprites {
        match Image::load(&sprite.path, sprite.alpha) {
            Ok(image) => {
                let mode = match sprite.color_key {
                    Some(key) => Composite::ColorKey(key),
                    None => Composite::AlphaBlend,
                };
                sprites.push((image, Point::new(sprite.x, sprite.y), mode));
            },
            Err(err) => log::warn!("skipping sprite {}: {}", sprite.path, err),
        }
    }

    let (mut display, texture_creator) =
        Display::with_options("softraster", scene.width, scene.height, opts.vsync)?;
    let mut target = RenderTarget::new(&texture_creator, scene.width, scene.height)?;
    let mut canvas = Canvas::new(scene.width as i32, scene.height as i32);

    'running: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'running,
                InputEvent::KeyDown(_) => {},
            }
        }

        canvas.clear(scene.background);

        if sprites.is_empty() {
            draw_primitives_demo(&mut canvas);
        }
        for (image, origin, mode) in &sprites {
            canvas.draw_image(image, *origin, *mode);
        }
        for f in &scene.filters {
            canvas.apply_filter(*f);
        }

        display.present(&mut target, &canvas)?;
    }

    log::info!("shutting down");
    Ok(())
}
