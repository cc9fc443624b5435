/// Opaque 24-bit color.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Composites `over` on top of `self` with opacity `alpha` in `0.0..=1.0`.
    #[must_use]
    pub fn blend(self, over: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |below: u8, above: u8| -> u8 {
            let value = f32::from(below) + (f32::from(above) - f32::from(below)) * alpha;
            value.round().clamp(0.0, 255.0) as u8
        };

        Rgb(mix(self.0, over.0), mix(self.1, over.1), mix(self.2, over.2))
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Fixed-size pixel surface with a few flat-shape primitives.
///
/// Everything drawn is clipped to the surface, so callers may pass shapes
/// that hang over the edge.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::default(); width as usize * height as usize],
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// Paints every pixel with `color`.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        self.for_each_in(rect, |_, _, pixel| *pixel = color);
    }

    /// Blends `color` at opacity `alpha` over every pixel of `rect`.
    pub fn blend_rect(&mut self, rect: PixelRect, color: Rgb, alpha: f32) {
        self.for_each_in(rect, |_, _, pixel| *pixel = pixel.blend(color, alpha));
    }

    /// Fills `rect` with its corners rounded to `radius`.
    pub fn fill_rounded_rect(&mut self, rect: PixelRect, radius: u32, color: Rgb) {
        let radius = i64::from(radius).min(rect.width / 2).min(rect.height / 2);
        let r = radius as f32;
        let left = rect.x + radius;
        let right = rect.x + rect.width - radius;
        let top = rect.y + radius;
        let bottom = rect.y + rect.height - radius;

        self.for_each_in(rect, |x, y, pixel| {
            // Nearest point of the inner (un-rounded) rectangle.
            let corner_x = if x < left {
                left
            } else if x >= right {
                right
            } else {
                *pixel = color;
                return;
            };
            let corner_y = if y < top {
                top
            } else if y >= bottom {
                bottom
            } else {
                *pixel = color;
                return;
            };

            let dx = x as f32 + 0.5 - corner_x as f32;
            let dy = y as f32 + 0.5 - corner_y as f32;
            if dx * dx + dy * dy <= r * r {
                *pixel = color;
            }
        });
    }

    /// Fills every pixel whose center lies within `radius` of `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        let bounds = PixelRect {
            x: (cx - radius).floor() as i64,
            y: (cy - radius).floor() as i64,
            width: (radius * 2.0).ceil() as i64 + 1,
            height: (radius * 2.0).ceil() as i64 + 1,
        };

        self.for_each_in(bounds, |x, y, pixel| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                *pixel = color;
            }
        });
    }

    /// Blends a one-pixel vertical line at column `x`.
    pub fn blend_vertical_line(&mut self, x: i64, color: Rgb, alpha: f32) {
        let rect = PixelRect {
            x,
            y: 0,
            width: 1,
            height: i64::from(self.height),
        };
        self.blend_rect(rect, color, alpha);
    }

    /// Blends a one-pixel horizontal line at row `y`.
    pub fn blend_horizontal_line(&mut self, y: i64, color: Rgb, alpha: f32) {
        let rect = PixelRect {
            x: 0,
            y,
            width: i64::from(self.width),
            height: 1,
        };
        self.blend_rect(rect, color, alpha);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn for_each_in(&mut self, rect: PixelRect, mut paint: impl FnMut(i64, i64, &mut Rgb)) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.width).min(i64::from(self.width));
        let y1 = (rect.y + rect.height).min(i64::from(self.height));

        for y in y0..y1 {
            for x in x0..x1 {
                let index = y as usize * self.width as usize + x as usize;
                paint(x, y, &mut self.pixels[index]);
            }
        }
    }
}
