// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    load_check_base_urls, load_check_paths, load_domains_from_file, load_domains_from_source,
    normalize_domain, read_list_file,
};
