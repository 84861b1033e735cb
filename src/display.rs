//! SDL2 presentation layer.
//!
//! A thin shell around window creation, the streaming texture the canvas is
//! uploaded into each frame, and event polling. No drawing logic lives
//! here; the canvas buffer is fully settled before it is handed over for
//! upload.

use crate::canvas::Canvas;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use sdl2::EventPump;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

pub struct Display {
    window_canvas: WindowCanvas,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// A streaming texture matching the canvas resolution
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

impl Display {
    /// Create a window with VSync enabled
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        Self::with_options(title, width, height, true)
    }

    /// Create a window with configurable VSync
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let window_canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = window_canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                window_canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Upload the canvas buffer and present the frame
    pub fn present(&mut self, target: &mut RenderTarget, canvas: &Canvas) -> Result<(), String> {
        target
            .texture
            .update(None, canvas.as_bytes(), (target.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.window_canvas.clear();
        self.window_canvas.copy(&target.texture, None, None)?;
        self.window_canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }
        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming texture sized to the canvas
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self { texture, width })
    }
}
