//! Zoom-dependent scaling configuration for graph visuals.
//!
//! This module centralizes all zoom-dependent visual parameters, making it easy to
//! understand and tune how elements behave at different zoom levels.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the layout. Node boxes live here
//!   and scale proportionally with zoom.
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of zoom level.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: Scales with zoom, like the node boxes themselves.
//! - [`ScaleBehavior::Screen`]: Constant screen size. Divides by `k` to counteract
//!   the canvas transform, maintaining fixed pixel size.
//! - [`ScaleBehavior::Clamped`]: World-space scaling with min/max screen-size bounds.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// Use `f64::INFINITY` for an unbounded maximum.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node box visuals.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Label font size in world units.
	pub label_size: f64,
	pub label_behavior: ScaleBehavior,
	/// Box corner radius in world units.
	pub corner_radius: f64,
	/// Border stroke width.
	pub border_width: f64,
	pub border_behavior: ScaleBehavior,
	/// Extra hit margin around each box, in screen pixels.
	pub hit_slop: f64,
	pub hit_behavior: ScaleBehavior,
	/// Connector handle radius (top and bottom dots).
	pub handle_radius: f64,
}

/// Configuration for edge visuals.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// How themed stroke widths scale with zoom.
	pub width_behavior: ScaleBehavior,
	/// Dash pattern (dash, gap) for animated edges, in world units.
	pub dash_pattern: (f64, f64),
	/// Flow animation speed (world units per second).
	pub flow_speed: f64,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// Relation label font size in world units.
	pub label_size: f64,
	/// How relation labels fade when zoomed out.
	pub label_alpha_behavior: AlphaBehavior,
	/// Minimum alpha to bother drawing labels.
	pub label_cull_alpha: f64,
	/// Corner radius of the smooth-step bends.
	pub bend_radius: f64,
}

/// Zoom limits and framing.
#[derive(Clone, Debug)]
pub struct ZoomConfig {
	pub min_k: f64,
	pub max_k: f64,
	/// Fraction of the viewport left empty around content on fit.
	pub fit_padding: f64,
	/// Multiplier applied per wheel notch or zoom button press.
	pub step: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub zoom: ZoomConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				label_size: 14.0,
				label_behavior: ScaleBehavior::World,
				corner_radius: 8.0,
				border_width: 2.0,
				border_behavior: ScaleBehavior::Clamped {
					min_screen: 1.0,
					max_screen: f64::INFINITY,
				},
				hit_slop: 2.0,
				hit_behavior: ScaleBehavior::Screen,
				handle_radius: 6.0,
			},
			edge: EdgeScaleConfig {
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 0.75,
					max_screen: 8.0,
				},
				dash_pattern: (5.0, 5.0),
				flow_speed: 20.0,
				arrow_size: 10.0,
				label_size: 10.0,
				label_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.4,
					full_alpha_k: 0.7,
				},
				label_cull_alpha: 0.05,
				bend_radius: 5.0,
			},
			zoom: ZoomConfig {
				min_k: 0.5,
				max_k: 2.0,
				fit_padding: 0.1,
				step: 1.2,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node label font (e.g. "14px sans-serif").
	pub label_font: String,
	/// Bold variant for the center node.
	pub center_label_font: String,
	pub border_width: f64,
	pub hit_slop: f64,
	pub edge_label_font: String,
	/// Relation label alpha multiplier [0, 1].
	pub edge_label_alpha: f64,
	/// Whether to skip drawing relation labels.
	pub cull_edge_labels: bool,
	width_behavior: ScaleBehavior,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_size = config.node.label_behavior.apply(config.node.label_size, k);
		let edge_label_alpha = config.edge.label_alpha_behavior.apply(k);

		Self {
			k,
			label_font: format!("{}px sans-serif", label_size),
			center_label_font: format!("600 {}px sans-serif", label_size),
			border_width: config
				.node
				.border_behavior
				.apply(config.node.border_width, k),
			hit_slop: config.node.hit_behavior.apply(config.node.hit_slop, k),
			edge_label_font: format!("500 {}px sans-serif", config.edge.label_size),
			edge_label_alpha,
			cull_edge_labels: edge_label_alpha < config.edge.label_cull_alpha,
			width_behavior: config.edge.width_behavior.clone(),
		}
	}

	/// World-space stroke width for a themed edge width.
	pub fn edge_width(&self, base: f64) -> f64 {
		self.width_behavior.apply(base, self.k)
	}

	/// Compute dash offset for flow animation.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(2.0, 2.0), 1.0);
		assert_eq!(ScaleBehavior::World.apply(2.0, 2.0), 2.0);
	}

	#[test]
	fn clamped_behavior_keeps_minimum_screen_size() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 1.0,
			max_screen: f64::INFINITY,
		};
		// At k=0.5 a 1px screen minimum is 2 world units.
		assert_eq!(behavior.apply(1.0, 0.5), 2.0);
		assert_eq!(behavior.apply(3.0, 1.0), 3.0);
	}

	#[test]
	fn edge_labels_fade_out_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert!(ScaledValues::new(&config, 0.3).cull_edge_labels);
		let near = ScaledValues::new(&config, 1.0);
		assert!(!near.cull_edge_labels);
		assert_eq!(near.edge_label_alpha, 1.0);
	}
}
