mod uv_resolver;

pub use uv_resolver::UvLockResolver;
