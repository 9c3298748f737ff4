pub mod camera;
pub mod core;
pub mod loading;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod simulation;
pub mod systems;
pub mod tracking;
