//! # planet_hands
//!
//! A spinning particle planet with a tilted ring system, viewed by a camera
//! whose orbit and zoom follow a tracked hand.
//!
//! ## Hand → Camera mapping
//!
//! | Hand | Camera |
//! |---|---|
//! | Roll left / right | Orbit around the planet (opposite direction, ×2) |
//! | Bring hand closer (bigger) | Zoom in |
//! | Move hand away (smaller) | Zoom out |
//! | Open palm or fist | Zoom follows the hand |
//! | Half-curled fingers | Zoom holds where it is |
//! | No hand | Camera settles on its last target |
//!
//! ## Visualization
//!
//! 15 000 planet particles (a dense shell over a sparse core, red-orange
//! inside fading to blue at the surface) and 8 000 white ring particles in
//! two bands, splatted additively as soft round sprites. The planet turns
//! slowly one way, the rings the other. A status line reads
//! `Initializing…`, `Tracking Active` or `Camera Error: …`.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse and keyboard drive a
//!   synthetic hand.
//! * `leap` — **Hardware mode**: hand joints come from a LeapMotion
//!   controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Hand |
//! |---|---|
//! | Mouse X | Roll (left edge −1.2 rad, right edge +1.2 rad) |
//! | Mouse Y | Distance (top = near, bottom = far) |
//! | `O` | Open palm |
//! | `F` | Fist |
//! | `R` | Relaxed / half-curled |
//! | `H` | Hide or show the hand |
//! | `Q` / `Escape` | Quit |

pub mod tracking;
pub mod scene;
pub mod font;
pub mod visualizer;
pub mod app;
