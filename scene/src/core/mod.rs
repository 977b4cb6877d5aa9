//! Core scene functionality: the entity hierarchy and camera math

pub mod camera;
pub mod entity;
