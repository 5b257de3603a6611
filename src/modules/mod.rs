pub mod author;
pub mod book;
pub mod bookinstance;
pub mod genre;

use std::sync::Arc;

use liber_kernel::ModuleRegistry;

use crate::catalog::Catalog;

/// Register all catalog modules with the registry. The book module
/// comes first; it owns the catalog home page.
pub fn register_all(registry: &mut ModuleRegistry, catalog: &Arc<Catalog>) {
    registry.register(Arc::new(book::BookModule::new(catalog.clone())));
    registry.register(Arc::new(author::AuthorModule::new(catalog.clone())));
    registry.register(Arc::new(genre::GenreModule::new(catalog.clone())));
    registry.register(Arc::new(bookinstance::BookInstanceModule::new(
        catalog.clone(),
    )));
}
