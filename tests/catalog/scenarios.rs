use std::collections::HashSet;

use catalog_store::{CatalogError, Product, ProductDraft};

use crate::support::{image, Workspace};

#[test]
fn create_drill() {
    let ws = Workspace::new();
    let product = ws
        .open()
        .create(
            &ProductDraft::new().name("Drill").price("49.99").category("Tools"),
            image("drill.png"),
        )
        .unwrap();

    assert_eq!(
        product,
        Product {
            id: 1,
            name: "Drill".into(),
            price: 49.99,
            category: "Tools".into(),
            image: "/images/drill.png".into(),
        }
    );
}

#[test]
fn ids_stay_unique_across_deletes_and_restarts() {
    let ws = Workspace::new();
    let mut seen = HashSet::new();

    for round in 0..3 {
        let service = ws.open();
        for i in 0..4 {
            let product = service
                .create(
                    &ProductDraft::new().name(format!("Item {round}-{i}")).price("1"),
                    image(&format!("item-{round}-{i}.png")),
                )
                .unwrap();
            assert!(seen.insert(product.id), "id {} reused", product.id);
        }
        let first = service.list().unwrap()[0].id;
        service.delete(first).unwrap();
    }
}

#[test]
fn third_create_after_deleting_first_does_not_collide() {
    let ws = Workspace::new();
    let service = ws.open();

    let first = service
        .create(&ProductDraft::new().name("First").price("1"), image("1.png"))
        .unwrap();
    let second = service
        .create(&ProductDraft::new().name("Second").price("1"), image("2.png"))
        .unwrap();
    service.delete(first.id).unwrap();
    let third = service
        .create(&ProductDraft::new().name("Third").price("1"), image("3.png"))
        .unwrap();

    assert_ne!(third.id, second.id);
    assert_eq!(service.get(second.id).unwrap().name, "Second");
    assert_eq!(service.get(third.id).unwrap().name, "Third");
}

#[test]
fn update_keeps_or_replaces_image() {
    let ws = Workspace::new();
    let service = ws.open();
    let created = service
        .create(&ProductDraft::new().name("Drill").price("49.99"), image("drill.png"))
        .unwrap();

    let kept = service
        .update(
            created.id,
            &ProductDraft::new().name("Drill").price("39.99"),
            None,
        )
        .unwrap();
    assert_eq!(kept.image, created.image);
    assert_eq!(kept.price, 39.99);

    let replaced = service
        .update(
            created.id,
            &ProductDraft::new().name("Drill").price("39.99"),
            image("drill-new.png"),
        )
        .unwrap();
    assert_eq!(replaced.image, "/images/drill-new.png");
    assert!(ws.image_dir().join("drill-new.png").exists());
    assert!(ws.image_dir().join("drill.png").exists());
}

#[test]
fn delete_of_unknown_id_leaves_catalog_unchanged() {
    let ws = Workspace::new();
    let service = ws.open();
    service
        .create(&ProductDraft::new().name("Drill").price("1"), image("drill.png"))
        .unwrap();

    let before = service.list().unwrap();
    let err = service.delete(404).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(404)));
    assert_eq!(service.list().unwrap(), before);
}

#[test]
fn validation_boundaries() {
    let ws = Workspace::new();
    let service = ws.open();

    let short = service
        .create(&ProductDraft::new().name("Dr").price("1"), image("a.png"))
        .unwrap_err();
    assert_eq!(short.status_code(), 400);

    assert!(service
        .create(&ProductDraft::new().name("Dri").price("1"), image("b.png"))
        .is_ok());

    let negative = service
        .create(&ProductDraft::new().name("Drill").price("-0.01"), image("c.png"))
        .unwrap_err();
    assert_eq!(negative.status_code(), 400);

    let free = service
        .create(&ProductDraft::new().name("Drill").price("0"), image("d.png"))
        .unwrap();
    assert_eq!(free.price, 0.0);
    assert_eq!(free.category, "General");

    // Rejected candidates never reach the image directory.
    assert!(!ws.image_dir().join("a.png").exists());
    assert!(!ws.image_dir().join("c.png").exists());
}

#[test]
fn same_filename_overwrites_earlier_upload() {
    let ws = Workspace::new();
    let service = ws.open();
    let a = service
        .create(&ProductDraft::new().name("Alpha").price("1"), image("shared.png"))
        .unwrap();
    let b = service
        .create(&ProductDraft::new().name("Beta").price("1"), image("shared.png"))
        .unwrap();

    assert_eq!(a.image, b.image);
    assert_eq!(
        std::fs::read_dir(ws.image_dir()).unwrap().count(),
        1
    );
}
