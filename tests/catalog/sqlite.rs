//! The same catalog contract, backed by SQLite.

use catalog_store::{CatalogError, CatalogService, InMemoryAssetStore, ProductDraft, SqliteCatalog};

use crate::support::image;

#[test]
fn sqlite_backend_honours_the_catalog_contract() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("products.db");

    {
        let service = CatalogService::new(SqliteCatalog::open(&path), InMemoryAssetStore::new());
        let first = service
            .create(&ProductDraft::new().name("First").price("1"), image("1.png"))
            .unwrap();
        let second = service
            .create(&ProductDraft::new().name("Second").price("2"), image("2.png"))
            .unwrap();
        service.delete(first.id).unwrap();
        let third = service
            .create(&ProductDraft::new().name("Third").price("3"), image("3.png"))
            .unwrap();
        assert_ne!(third.id, second.id);

        let kept = service
            .update(second.id, &ProductDraft::new().name("Second").price("20"), None)
            .unwrap();
        assert_eq!(kept.image, "/images/2.png");

        assert!(matches!(service.delete(first.id), Err(CatalogError::NotFound(_))));
    }

    let service = CatalogService::new(SqliteCatalog::open(&path), InMemoryAssetStore::new());
    let names: Vec<_> = service.list().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Second", "Third"]);
}
