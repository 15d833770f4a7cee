//! A house with a car driving circles around it, a parked car, clouds and
//! two lights, seen through an orbit camera.

pub mod config;
pub mod logging;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;
