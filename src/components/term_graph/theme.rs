//! Visual theming for the term graph.
//!
//! Colors and stroke widths for node boxes, relation edges in each highlight
//! emphasis, and the dotted canvas background.

use super::highlight::Emphasis;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Dot grid color
	pub dot_color: Color,
	/// Dot spacing in world units
	pub dot_gap: f64,
	/// Dot radius in world units
	pub dot_size: f64,
}

/// Fill, border and text for one kind of node box.
#[derive(Clone, Copy, Debug)]
pub struct BoxStyle {
	pub fill: Color,
	pub border: Color,
	pub text: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Plain term
	pub base: BoxStyle,
	/// Term inside the hovered neighborhood
	pub highlighted: BoxStyle,
	/// Root concept
	pub center: BoxStyle,
	/// Size multiplier applied to highlighted boxes
	pub highlight_scale: f64,
	/// Connector handle fill
	pub handle_color: Color,
	/// Drop shadow color
	pub shadow: Color,
}

/// Stroke for one edge emphasis.
#[derive(Clone, Copy, Debug)]
pub struct EdgeStroke {
	pub color: Color,
	pub width: f64,
	/// Flowing dash animation
	pub animated: bool,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// No node focused
	pub base: EdgeStroke,
	/// Edge touching the focused node
	pub connected: EdgeStroke,
	/// Edge elsewhere while a node is focused
	pub muted: EdgeStroke,
	/// Arrowhead color
	pub marker: Color,
	pub label_color: Color,
	pub label_background: Color,
}

impl EdgeStyle {
	pub fn stroke(&self, emphasis: Emphasis) -> EdgeStroke {
		match emphasis {
			Emphasis::Base => self.base,
			Emphasis::Connected => self.connected,
			Emphasis::Muted => self.muted,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Light theme with pink relation edges (default)
	pub fn default_theme() -> Self {
		let pink_800 = Color::rgb(157, 23, 77);
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				dot_color: Color::rgb(249, 168, 212),
				dot_gap: 12.0,
				dot_size: 1.0,
			},
			edge: EdgeStyle {
				base: EdgeStroke {
					color: pink_800,
					width: 2.0,
					animated: false,
				},
				connected: EdgeStroke {
					color: Color::rgb(190, 24, 93),
					width: 3.0,
					animated: true,
				},
				muted: EdgeStroke {
					color: Color::rgb(229, 231, 235),
					width: 1.0,
					animated: false,
				},
				marker: pink_800,
				label_color: Color::rgb(75, 85, 99),
				label_background: Color::rgba(253, 242, 248, 0.9),
			},
			node: NodeStyle {
				base: BoxStyle {
					fill: Color::rgb(255, 255, 255),
					border: Color::rgb(209, 213, 219),
					text: Color::rgb(17, 24, 39),
				},
				highlighted: BoxStyle {
					fill: Color::rgb(253, 242, 248),
					border: Color::rgb(236, 72, 153),
					text: Color::rgb(17, 24, 39),
				},
				center: BoxStyle {
					fill: Color::rgb(17, 24, 39),
					border: Color::rgb(17, 24, 39),
					text: Color::rgb(255, 255, 255),
				},
				highlight_scale: 1.05,
				handle_color: Color::rgb(236, 72, 153),
				shadow: Color::rgba(0, 0, 0, 0.1),
			},
		}
	}

	/// Dark theme with the same emphasis rules
	pub fn midnight() -> Self {
		let rose = Color::rgb(244, 114, 182);
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				dot_color: Color::rgba(244, 114, 182, 0.35),
				dot_gap: 12.0,
				dot_size: 1.0,
			},
			edge: EdgeStyle {
				base: EdgeStroke {
					color: rose.with_alpha(0.7),
					width: 2.0,
					animated: false,
				},
				connected: EdgeStroke {
					color: rose,
					width: 3.0,
					animated: true,
				},
				muted: EdgeStroke {
					color: Color::rgba(100, 110, 130, 0.35),
					width: 1.0,
					animated: false,
				},
				marker: rose,
				label_color: Color::rgb(203, 213, 225),
				label_background: Color::rgba(30, 35, 48, 0.9),
			},
			node: NodeStyle {
				base: BoxStyle {
					fill: Color::rgb(30, 35, 48),
					border: Color::rgb(71, 85, 105),
					text: Color::rgb(226, 232, 240),
				},
				highlighted: BoxStyle {
					fill: Color::rgb(30, 35, 48).lerp(rose, 0.2),
					border: rose,
					text: Color::rgb(255, 255, 255),
				},
				center: BoxStyle {
					fill: Color::rgb(241, 245, 249),
					border: Color::rgb(241, 245, 249),
					text: Color::rgb(15, 23, 42),
				},
				highlight_scale: 1.05,
				handle_color: rose,
				shadow: Color::rgba(0, 0, 0, 0.4),
			},
		}
	}

	/// Look up a theme by name, falling back to the default.
	pub fn named(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
