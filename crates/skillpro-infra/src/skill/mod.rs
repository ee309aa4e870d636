pub mod fs_loader;
