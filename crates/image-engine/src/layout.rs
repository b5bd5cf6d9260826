//! Dimensions and styling for the two SmartQR layouts.

use image::Rgba;

/// How the label canvas is merged with the QR bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Label overlaid on the bottom of the QR bitmap; height unchanged.
    Plain,
    /// Canvas grown by the label height; label drawn into the new strip.
    Banner,
}

impl LabelStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Banner => "banner",
        }
    }
}

/// Horizontal placement of the label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAlign {
    /// Centered using glyph advances and kerning.
    Measured,
    /// `width/2 - 10 * byte_len`, the character-count approximation.
    CharCount,
}

impl LabelAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Measured => "measured",
            Self::CharCount => "char-count",
        }
    }
}

/// Complete set of compositing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub qr_size: u32,
    pub logo_box: (u32, u32),
    pub label_width: u32,
    pub label_height: u32,
    /// Point size at 72 DPI, so one point is one pixel of em height.
    pub font_size_pt: f32,
    pub style: LabelStyle,
    pub text_color: Rgba<u8>,
    /// `None` leaves the label canvas transparent.
    pub background: Option<Rgba<u8>>,
    pub align: LabelAlign,
}

/// Blue band behind banner labels.
pub const BANNER_BACKGROUND: Rgba<u8> = Rgba([1, 124, 254, 255]);

impl LayoutConfig {
    /// 256px code with a transparent 225x50 label over its bottom edge.
    pub fn plain() -> Self {
        Self {
            qr_size: 256,
            logo_box: (65, 65),
            label_width: 225,
            label_height: 50,
            font_size_pt: 15.0,
            style: LabelStyle::Plain,
            text_color: Rgba([0, 0, 0, 255]),
            background: None,
            align: LabelAlign::Measured,
        }
    }

    /// 1024px code with a 1024x80 colored banner appended below.
    pub fn banner() -> Self {
        Self {
            qr_size: 1024,
            logo_box: (200, 200),
            label_width: 1024,
            label_height: 80,
            font_size_pt: 30.0,
            style: LabelStyle::Banner,
            text_color: Rgba([255, 255, 255, 255]),
            background: Some(BANNER_BACKGROUND),
            align: LabelAlign::Measured,
        }
    }

    pub fn with_align(mut self, align: LabelAlign) -> Self {
        self.align = align;
        self
    }

    /// Final image size before the label is merged in.
    ///
    /// The QR bitmap can come out larger than `qr_size` when the symbol
    /// does not fit; see [`crate::qr::generate_qr`].
    pub fn output_dimensions(&self, qr_width: u32, qr_height: u32) -> (u32, u32) {
        match self.style {
            LabelStyle::Plain => (qr_width, qr_height),
            LabelStyle::Banner => (qr_width, qr_height + self.label_height),
        }
    }

    /// Stable textual form used to key generated outputs.
    pub fn fingerprint(&self) -> String {
        let bg = self
            .background
            .map(|c| format!("{},{},{},{}", c[0], c[1], c[2], c[3]))
            .unwrap_or_else(|| "none".to_string());
        let fg = self.text_color;
        format!(
            "{}|{}|{}x{}|{}x{}|{}|{},{},{},{}|{}|{}",
            self.style.as_str(),
            self.qr_size,
            self.logo_box.0,
            self.logo_box.1,
            self.label_width,
            self.label_height,
            self.font_size_pt,
            fg[0],
            fg[1],
            fg[2],
            fg[3],
            bg,
            self.align.as_str(),
        )
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::banner()
    }
}
