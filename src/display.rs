use log::trace;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome framebuffer. Sprites are XORed on and wrap around both edges.
pub struct Screen {
    bit_buffer: [[bool; WIDTH]; HEIGHT],
    dirty: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
            dirty: true,
        }
    }

    pub fn clear(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XORs an 8 pixel wide sprite, one byte per row, onto the screen at (x, y).
    ///
    /// Returns true if any pixel went from on to off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        trace!("painting sprite at ({x}, {y}): {sprite:02X?}");
        let mut collision = false;
        for (row, bits) in sprite.iter().enumerate() {
            let ny = (y as usize + row) % HEIGHT;
            for col in 0..8 {
                if (bits >> (7 - col)) & 1 == 0 {
                    continue;
                }
                let nx = (x as usize + col) % WIDTH;
                let pixel = &mut self.bit_buffer[ny][nx];
                if *pixel {
                    collision = true;
                }
                *pixel = !*pixel;
            }
        }
        self.dirty = true;
        collision
    }

    /// Coordinates off the screen read as unset.
    pub fn is_pixel_set(&self, x: usize, y: usize) -> bool {
        self.bit_buffer
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Row-major iterator over every pixel.
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        self.bit_buffer.iter().flat_map(|row| row.iter().copied())
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_sets_pixels() {
        let mut screen = Screen::new();
        // top row of the glyph 0
        let collision = screen.draw_sprite(1, 1, &[0xF0]);
        assert!(!collision);
        for x in 1..5 {
            assert!(screen.is_pixel_set(x, 1));
        }
        assert!(!screen.is_pixel_set(0, 1));
        assert!(!screen.is_pixel_set(5, 1));
        assert_eq!(screen.pixels().filter(|p| *p).count(), 4);
    }

    #[test]
    fn test_draw_twice_collides_and_cancels() {
        let mut screen = Screen::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!screen.draw_sprite(10, 5, &sprite));
        assert!(screen.draw_sprite(10, 5, &sprite));
        assert!(screen.pixels().all(|p| !p));
    }

    #[test]
    fn test_xor_partial_overlap() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0b0101_0000]);
        let collision = screen.draw_sprite(0, 0, &[0b1100_0000]);
        assert!(collision);
        assert!(screen.is_pixel_set(0, 0));
        assert!(!screen.is_pixel_set(1, 0));
        assert!(!screen.is_pixel_set(2, 0));
        assert!(screen.is_pixel_set(3, 0));
    }

    #[test]
    fn test_no_collision_when_lighting_new_pixels() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0b1000_0000]);
        assert!(!screen.draw_sprite(0, 0, &[0b0100_0000]));
    }

    #[test]
    fn test_wraps_around_edges() {
        let mut screen = Screen::new();
        screen.draw_sprite(62, 31, &[0xFF, 0xFF]);
        assert!(screen.is_pixel_set(63, 31));
        assert!(screen.is_pixel_set(0, 31));
        assert!(screen.is_pixel_set(5, 31));
        assert!(screen.is_pixel_set(62, 0));
        assert!(screen.is_pixel_set(0, 0));
        assert!(!screen.is_pixel_set(6, 31));
    }

    #[test]
    fn test_start_coordinates_wrap() {
        let mut screen = Screen::new();
        screen.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(screen.is_pixel_set(3, 2));
    }

    #[test]
    fn test_clear() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0xFF; 15]);
        screen.clear();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                assert!(!screen.is_pixel_set(x, y));
            }
        }
    }

    #[test]
    fn test_off_screen_query() {
        let screen = Screen::new();
        assert!(!screen.is_pixel_set(WIDTH, 0));
        assert!(!screen.is_pixel_set(0, HEIGHT));
    }

    #[test]
    fn test_dirty_flag() {
        let mut screen = Screen::new();
        assert!(screen.take_dirty());
        assert!(!screen.take_dirty());
        screen.draw_sprite(0, 0, &[0x80]);
        assert!(screen.take_dirty());
    }
}
