pub mod clip_loader;
