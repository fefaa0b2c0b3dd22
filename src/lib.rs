//! Core of a top-down arcade shooter: a player moves with WASD and fires at
//! the pointer, enemies wander, power-ups grant timed stat boosts, and
//! defeated enemies drop coins.
//!
//! The core never touches a device.  Input, drawing, audio and asset loading
//! come in through the [`input::InputSource`], [`render::Surface`],
//! [`audio::Audio`] and [`assets::AssetLoader`] traits; the binary plugs a
//! terminal in behind them.

pub mod assets;
pub mod audio;
pub mod components;
pub mod config;
pub mod entities;
pub mod error;
pub mod frame;
pub mod game;
pub mod geometry;
pub mod input;
pub mod prefabs;
pub mod registry;
pub mod render;
pub mod timer;
