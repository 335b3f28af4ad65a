//! Integration tests for `SqliteStore` against an in-memory database.

use folio_core::store::{MetadataStore, NewPageRecord, PageQuery};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn record(slug: &str) -> NewPageRecord {
  NewPageRecord {
    page_id:      Uuid::new_v4(),
    slug:         slug.to_owned(),
    name:         slug.to_owned(),
    archive_date: None,
    revision_id:  Uuid::new_v4(),
    snapshot_id:  Uuid::new_v4(),
    author:       "tester".to_owned(),
  }
}

// ─── Pages ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_page_creates_page_revision_and_snapshot() {
  let s = store().await;

  let (page, revision, snapshot) = s.insert_page(record("intro")).await.unwrap();
  assert_eq!(page.slug, "intro");
  assert_eq!(page.last_revision_id, Some(revision.uuid));
  assert_eq!(revision.page_id, page.uuid);
  assert_eq!(snapshot.page, page.uuid);
  assert_eq!(snapshot.revision, revision.uuid);

  let fetched = s.get_page(page.uuid).await.unwrap();
  assert_eq!(fetched.slug, "intro");
  assert_eq!(fetched.last_revision_id, Some(revision.uuid));
  assert!(fetched.deleted_at.is_none());
}

#[tokio::test]
async fn get_page_missing_fails_not_found() {
  let s = store().await;
  let err = s.get_page(Uuid::new_v4()).await.unwrap_err();
  assert!(err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn resolve_slug_round_trips() {
  let s = store().await;
  let (page, _, _) = s.insert_page(record("intro")).await.unwrap();

  assert_eq!(s.resolve_slug("intro").await.unwrap(), page.uuid);

  let err = s.resolve_slug("missing").await.unwrap_err();
  assert!(err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
  let s = store().await;
  s.insert_page(record("intro")).await.unwrap();

  let err = s.insert_page(record("intro")).await.unwrap_err();
  assert!(
    matches!(err, folio_core::Error::Database(_)),
    "got {err:?}"
  );
}

#[tokio::test]
async fn list_pages_orders_by_slug_and_paginates() {
  let s = store().await;
  let (c, _, _) = s.insert_page(record("cherry")).await.unwrap();
  let (a, _, _) = s.insert_page(record("apple")).await.unwrap();
  let (b, _, _) = s.insert_page(record("banana")).await.unwrap();

  let all = s
    .list_pages(&PageQuery { offset: 0, count: 10, category: None })
    .await
    .unwrap();
  assert_eq!(all, vec![a.uuid, b.uuid, c.uuid]);

  let middle = s
    .list_pages(&PageQuery { offset: 1, count: 1, category: None })
    .await
    .unwrap();
  assert_eq!(middle, vec![b.uuid]);
}

#[tokio::test]
async fn list_pages_excludes_deleted() {
  let s = store().await;
  let (a, _, _) = s.insert_page(record("apple")).await.unwrap();
  let (b, _, _) = s.insert_page(record("banana")).await.unwrap();

  s.mark_page_deleted(a.uuid).await.unwrap();

  let live = s
    .list_pages(&PageQuery { offset: 0, count: 10, category: None })
    .await
    .unwrap();
  assert_eq!(live, vec![b.uuid]);

  // The deleted page row itself is still there.
  let page = s.get_page(a.uuid).await.unwrap();
  assert!(page.deleted_at.is_some());
}

// ─── Revisions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_revision_assigns_strictly_increasing_times() {
  let s = store().await;
  let (page, first, _) = s.insert_page(record("intro")).await.unwrap();

  let r2 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();
  let r3 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "b")
    .await
    .unwrap();

  assert!(r2.date_time > first.date_time);
  assert!(r3.date_time > r2.date_time);

  // last_revision_id follows the appends.
  let fetched = s.get_page(page.uuid).await.unwrap();
  assert_eq!(fetched.last_revision_id, Some(r3.uuid));
}

#[tokio::test]
async fn list_revisions_orders_ascending() {
  let s = store().await;
  let (page, first, _) = s.insert_page(record("intro")).await.unwrap();
  let r2 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();
  let r3 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();

  let ids = s.list_revisions(page.uuid, 0, 10).await.unwrap();
  assert_eq!(ids, vec![first.uuid, r2.uuid, r3.uuid]);

  let tail = s.list_revisions(page.uuid, 1, 10).await.unwrap();
  assert_eq!(tail, vec![r2.uuid, r3.uuid]);
}

#[tokio::test]
async fn count_and_range_queries_respect_bounds() {
  let s = store().await;
  let (page, first, _) = s.insert_page(record("intro")).await.unwrap();
  let r2 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();
  let r3 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();

  assert_eq!(
    s.count_revisions_after(page.uuid, first.date_time).await.unwrap(),
    2
  );
  assert_eq!(
    s.count_revisions_after(page.uuid, r3.date_time).await.unwrap(),
    0
  );

  let between = s
    .revisions_between(page.uuid, first.date_time, r3.date_time)
    .await
    .unwrap();
  let ids: Vec<Uuid> = between.iter().map(|r| r.uuid).collect();
  assert_eq!(ids, vec![r2.uuid, r3.uuid]);
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_at_or_before_picks_the_nearest_checkpoint() {
  let s = store().await;
  let (page, first, snap1) = s.insert_page(record("intro")).await.unwrap();

  let r2 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();
  let r3 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();
  let snap2 = s
    .insert_snapshot(Uuid::new_v4(), page.uuid, r3.uuid)
    .await
    .unwrap();
  let r4 = s
    .insert_revision(Uuid::new_v4(), page.uuid, "a")
    .await
    .unwrap();

  // Targets below the second checkpoint resolve to the first.
  assert_eq!(
    s.snapshot_at_or_before(first.uuid).await.unwrap().uuid,
    snap1.uuid
  );
  assert_eq!(
    s.snapshot_at_or_before(r2.uuid).await.unwrap().uuid,
    snap1.uuid
  );
  // At and past the second checkpoint resolve to it.
  assert_eq!(
    s.snapshot_at_or_before(r3.uuid).await.unwrap().uuid,
    snap2.uuid
  );
  assert_eq!(
    s.snapshot_at_or_before(r4.uuid).await.unwrap().uuid,
    snap2.uuid
  );
}

#[tokio::test]
async fn snapshot_at_or_before_unknown_revision_fails() {
  let s = store().await;
  let err = s.snapshot_at_or_before(Uuid::new_v4()).await.unwrap_err();
  assert!(err.is_not_found(), "got {err:?}");
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn category_filter_by_slug_and_id() {
  let s = store().await;
  let (a, _, _) = s.insert_page(record("apple")).await.unwrap();
  let (b, _, _) = s.insert_page(record("banana")).await.unwrap();
  s.insert_page(record("cherry")).await.unwrap();

  let fruit = s.create_category("fruit").await.unwrap();
  s.tag_page(a.uuid, "fruit").await.unwrap();
  s.tag_page(b.uuid, &fruit.id.to_string()).await.unwrap();

  let by_slug = s
    .list_pages(&PageQuery {
      offset:   0,
      count:    10,
      category: Some("fruit".to_owned()),
    })
    .await
    .unwrap();
  assert_eq!(by_slug, vec![a.uuid, b.uuid]);

  let by_id = s
    .list_pages(&PageQuery {
      offset:   0,
      count:    10,
      category: Some(fruit.id.to_string()),
    })
    .await
    .unwrap();
  assert_eq!(by_id, by_slug);
}

#[tokio::test]
async fn unknown_category_yields_empty_listing() {
  let s = store().await;
  s.insert_page(record("apple")).await.unwrap();

  let none = s
    .list_pages(&PageQuery {
      offset:   0,
      count:    10,
      category: Some("no-such-category".to_owned()),
    })
    .await
    .unwrap();
  assert!(none.is_empty());
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_page_deleted_is_not_repeatable() {
  let s = store().await;
  let (page, _, _) = s.insert_page(record("intro")).await.unwrap();

  s.mark_page_deleted(page.uuid).await.unwrap();
  // A second delete matches no live row.
  let err = s.mark_page_deleted(page.uuid).await.unwrap_err();
  assert!(err.is_not_found(), "got {err:?}");
}
