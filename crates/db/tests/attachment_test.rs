//! Attachment store integration tests: upload atomicity and cascades.

mod common;

use common::{blob_store, reconciled_pool, upload_count};
use inventaris_core::AttachmentKind;
use inventaris_db::stores::{NewItem, UploadInput};
use inventaris_db::{AttachmentStore, ItemStore};
use inventaris_shared::AppError;

const MAX_SIZE: u64 = 20 * 1024 * 1024;

fn upload(item_id: i64, name: &str, content: Vec<u8>) -> UploadInput {
    UploadInput {
        item_id,
        kind: AttachmentKind::Receipt,
        original_name: name.to_string(),
        mime_type: Some("application/pdf".to_string()),
        content,
    }
}

#[tokio::test]
async fn upload_persists_file_and_row() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let items = ItemStore::new(pool.clone(), blobs.clone());
    let attachments = AttachmentStore::new(pool, blobs.clone(), MAX_SIZE);

    let item_id = items
        .create(&NewItem {
            label: "Boormachine".to_string(),
            ..NewItem::default()
        })
        .await
        .expect("item");

    let row = attachments
        .upload(upload(item_id, "bon.pdf", vec![0u8; 1024]))
        .await
        .expect("upload succeeds");

    assert_eq!(row.item_id, item_id);
    assert_eq!(row.kind, "receipt");
    assert_eq!(row.size_bytes, Some(1024));
    assert_eq!(row.original_name.as_deref(), Some("bon.pdf"));
    assert!(row.stored_name.ends_with("-bon.pdf"));
    assert!(blobs.exists(&row.stored_name).await);

    let listed = attachments.list(item_id).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].stored_name, row.stored_name);
}

#[tokio::test]
async fn oversized_upload_rejected_before_write() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let items = ItemStore::new(pool.clone(), blobs.clone());
    let attachments = AttachmentStore::new(pool, blobs, 1024);

    let item_id = items
        .create(&NewItem {
            label: "Schuurmachine".to_string(),
            ..NewItem::default()
        })
        .await
        .expect("item");

    let err = attachments
        .upload(upload(item_id, "groot.pdf", vec![0u8; 2048]))
        .await
        .expect_err("too large");
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(upload_count(&dir), 0);
}

#[tokio::test]
async fn upload_to_missing_item_is_not_found() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let attachments = AttachmentStore::new(pool, blobs, MAX_SIZE);

    let err = attachments
        .upload(upload(12_345, "bon.pdf", vec![1, 2, 3]))
        .await
        .expect_err("missing parent rejected");
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(upload_count(&dir), 0);
}

#[tokio::test]
async fn failed_insert_leaves_no_orphan_file() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let items = ItemStore::new(pool.clone(), blobs.clone());
    let attachments = AttachmentStore::new(pool.clone(), blobs, MAX_SIZE);

    let item_id = items
        .create(&NewItem {
            label: "Zaag".to_string(),
            ..NewItem::default()
        })
        .await
        .expect("item");

    // Force the row insert to fail after the blob write.
    sqlx::query("DROP TABLE attachments")
        .execute(&pool)
        .await
        .expect("drop");

    let err = attachments
        .upload(upload(item_id, "bon.pdf", vec![0u8; 64]))
        .await
        .expect_err("insert fails");
    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(upload_count(&dir), 0, "orphan file left behind");
}

#[tokio::test]
async fn delete_removes_row_then_file() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let items = ItemStore::new(pool.clone(), blobs.clone());
    let attachments = AttachmentStore::new(pool, blobs.clone(), MAX_SIZE);

    let item_id = items
        .create(&NewItem {
            label: "Lijmklem".to_string(),
            ..NewItem::default()
        })
        .await
        .expect("item");
    let row = attachments
        .upload(upload(item_id, "handleiding.pdf", vec![0u8; 10]))
        .await
        .expect("upload");

    let advisory = attachments.delete(row.id).await.expect("delete");
    assert!(advisory.is_none());
    assert!(!blobs.exists(&row.stored_name).await);
    assert!(attachments.list(item_id).await.expect("list").is_empty());
}

#[tokio::test]
async fn delete_of_absent_attachment_is_idempotent() {
    let (dir, pool) = reconciled_pool().await;
    let attachments = AttachmentStore::new(pool, blob_store(&dir), MAX_SIZE);

    let advisory = attachments
        .delete(404_404)
        .await
        .expect("absent id succeeds");
    assert!(advisory.is_none());
}

#[tokio::test]
async fn item_delete_cascades_rows_and_files() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let items = ItemStore::new(pool.clone(), blobs.clone());
    let attachments = AttachmentStore::new(pool, blobs.clone(), MAX_SIZE);

    let item_id = items
        .create(&NewItem {
            label: "Accu".to_string(),
            ..NewItem::default()
        })
        .await
        .expect("item");
    let first = attachments
        .upload(upload(item_id, "bon.pdf", vec![0u8; 5]))
        .await
        .expect("upload");
    let second = attachments
        .upload(upload(item_id, "bon.pdf", vec![0u8; 5]))
        .await
        .expect("second upload of same name");
    assert_ne!(first.stored_name, second.stored_name);

    let advisories = items.delete(item_id).await.expect("delete item");
    assert!(advisories.is_empty(), "advisories: {advisories:?}");

    assert!(attachments.list(item_id).await.expect("list").is_empty());
    assert!(!blobs.exists(&first.stored_name).await);
    assert!(!blobs.exists(&second.stored_name).await);
    assert_eq!(upload_count(&dir), 0);
}

#[tokio::test]
async fn cascade_tolerates_already_missing_file() {
    let (dir, pool) = reconciled_pool().await;
    let blobs = blob_store(&dir);
    let items = ItemStore::new(pool.clone(), blobs.clone());
    let attachments = AttachmentStore::new(pool, blobs.clone(), MAX_SIZE);

    let item_id = items
        .create(&NewItem {
            label: "Slijptol".to_string(),
            ..NewItem::default()
        })
        .await
        .expect("item");
    let row = attachments
        .upload(upload(item_id, "bon.pdf", vec![0u8; 5]))
        .await
        .expect("upload");

    // Someone removed the file out from under us.
    blobs.delete(&row.stored_name).await.expect("manual delete");

    let advisories = items.delete(item_id).await.expect("delete item");
    assert!(advisories.is_empty(), "absent file is not a failure");
    assert!(attachments.list(item_id).await.expect("list").is_empty());
}
