//! Frame-rate independent easing used by every animated property.

mod ease;

pub use ease::{ease_factor, ease_toward, rate_for_factor, ChangeNotifier};
