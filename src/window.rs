use anyhow::Context;
use emuchip::display::{Screen, HEIGHT, WIDTH};
use minifb::{Key, KeyRepeat, Scale, WindowOptions};

const ON: u32 = 0x00_7F_FF;
const OFF: u32 = 0x00_00_00;

pub struct Window {
    pixel_buffer: Vec<u32>,
    window: minifb::Window,
}

impl Window {
    pub fn new(scale: u8) -> anyhow::Result<Self> {
        let scale = match scale {
            1 => Scale::X1,
            2 => Scale::X2,
            4 => Scale::X4,
            8 => Scale::X8,
            32 => Scale::X32,
            _ => Scale::X16,
        };
        let mut window = minifb::Window::new(
            "emuchip - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )
        .context("opening window")?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![OFF; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Host symbols for keys that went down / up since the last update.
    pub fn key_events(&self) -> (Vec<char>, Vec<char>) {
        let down = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(key_symbol)
            .collect();
        let up = self
            .window
            .get_keys_released()
            .into_iter()
            .filter_map(key_symbol)
            .collect();
        (down, up)
    }

    /// Pushes the framebuffer if it changed, otherwise just pumps events.
    pub fn sync(&mut self, screen: &mut Screen) -> anyhow::Result<()> {
        if screen.take_dirty() {
            for (pixel, on) in self.pixel_buffer.iter_mut().zip(screen.pixels()) {
                *pixel = if on { ON } else { OFF };
            }
            self.window
                .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
                .context("updating window")?;
        } else {
            self.window.update();
        }
        Ok(())
    }
}

fn key_symbol(key: Key) -> Option<char> {
    let symbol = match key {
        Key::Key1 => '1',
        Key::Key2 => '2',
        Key::Key3 => '3',
        Key::Key4 => '4',
        Key::Q => 'q',
        Key::W => 'w',
        Key::E => 'e',
        Key::R => 'r',
        Key::A => 'a',
        Key::S => 's',
        Key::D => 'd',
        Key::F => 'f',
        Key::Z => 'z',
        Key::X => 'x',
        Key::C => 'c',
        Key::V => 'v',
        _ => return None,
    };
    Some(symbol)
}
