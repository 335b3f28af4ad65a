//! [`SqliteStore`] — the SQLite implementation of [`MetadataStore`].

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use folio_core::{
  page::{Category, Page},
  revision::{Revision, Snapshot},
  store::{MetadataStore, NewPageRecord, PageQuery},
};

use crate::{
  Error, Result,
  encode::{
    RawPage, RawRevision, RawSnapshot, decode_dt, encode_date, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio metadata store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn page_row(&self, id: Uuid) -> Result<Option<RawPage>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT uuid, slug, name, archive_date, last_revision_id, deleted_at
               FROM pages WHERE uuid = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPage {
                  uuid:             row.get(0)?,
                  slug:             row.get(1)?,
                  name:             row.get(2)?,
                  archive_date:     row.get(3)?,
                  last_revision_id: row.get(4)?,
                  deleted_at:       row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  async fn revision_row(&self, id: Uuid) -> Result<Option<RawRevision>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRevision> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT uuid, page_id, date_time, author
               FROM revisions WHERE uuid = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawRevision {
                  uuid:      row.get(0)?,
                  page_id:   row.get(1)?,
                  date_time: row.get(2)?,
                  author:    row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  /// Assign the next `date_time` for a page: wall-clock now, bumped by one
  /// microsecond past the page's latest revision if the clock has not moved.
  /// Keeps the per-page revision order total even for same-instant appends.
  async fn next_date_time(&self, page_id: Uuid) -> Result<DateTime<Utc>> {
    let page_id_str = encode_uuid(page_id);

    let max: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(date_time) FROM revisions WHERE page_id = ?1",
          rusqlite::params![page_id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    let now = Utc::now();
    Ok(match max {
      Some(max) => {
        let max = decode_dt(&max)?;
        if now > max { now } else { max + Duration::microseconds(1) }
      }
      None => now,
    })
  }

  /// Accept a category as a numeric id or a slug; `None` if it matches
  /// neither.
  pub async fn resolve_category(&self, category: &str) -> Result<Option<i64>> {
    let by_id = category.parse::<i64>().ok();
    let slug = category.to_owned();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        if let Some(id) = by_id {
          let found: Option<i64> = conn
            .query_row(
              "SELECT id FROM categories WHERE id = ?1",
              rusqlite::params![id],
              |row| row.get(0),
            )
            .optional()?;
          if found.is_some() {
            return Ok(found);
          }
        }
        Ok(
          conn
            .query_row(
              "SELECT id FROM categories WHERE slug = ?1",
              rusqlite::params![slug],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(id)
  }
}

// ─── MetadataStore impl ──────────────────────────────────────────────────────

impl MetadataStore for SqliteStore {
  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn resolve_slug(&self, slug: &str) -> folio_core::Result<Uuid> {
    let slug_owned = slug.to_owned();

    let id_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT uuid FROM pages WHERE slug = ?1",
              rusqlite::params![slug_owned],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    match id_str {
      Some(s) => Ok(crate::encode::decode_uuid(&s)?),
      None => Err(Error::PageNotFound(slug.to_owned()).into()),
    }
  }

  async fn get_page(&self, id: Uuid) -> folio_core::Result<Page> {
    let raw = self
      .page_row(id)
      .await?
      .ok_or_else(|| Error::PageNotFound(id.to_string()))?;
    Ok(raw.into_page()?)
  }

  async fn list_pages(&self, query: &PageQuery) -> folio_core::Result<Vec<Uuid>> {
    let category_id = match &query.category {
      Some(category) => match self.resolve_category(category).await? {
        Some(id) => Some(id),
        // Unknown category filters everything out rather than erroring.
        None => return Ok(vec![]),
      },
      None => None,
    };

    let count = query.count as i64;
    let offset = query.offset as i64;

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(cat) = category_id {
          let mut stmt = conn.prepare(
            "SELECT p.uuid FROM pages p
             JOIN page_categories pc ON pc.page_id = p.uuid
             WHERE p.deleted_at IS NULL AND pc.category_id = ?1
             ORDER BY p.slug
             LIMIT ?2 OFFSET ?3",
          )?;
          stmt
            .query_map(rusqlite::params![cat, count, offset], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT uuid FROM pages
             WHERE deleted_at IS NULL
             ORDER BY slug
             LIMIT ?1 OFFSET ?2",
          )?;
          stmt
            .query_map(rusqlite::params![count, offset], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?
        };
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    ids
      .iter()
      .map(|s| crate::encode::decode_uuid(s).map_err(folio_core::Error::from))
      .collect()
  }

  async fn get_revision(&self, id: Uuid) -> folio_core::Result<Revision> {
    let raw = self
      .revision_row(id)
      .await?
      .ok_or(Error::RevisionNotFound(id))?;
    Ok(raw.into_revision()?)
  }

  async fn list_revisions(
    &self,
    page_id: Uuid,
    offset: usize,
    count: usize,
  ) -> folio_core::Result<Vec<Uuid>> {
    let page_id_str = encode_uuid(page_id);
    let count = count as i64;
    let offset = offset as i64;

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT uuid FROM revisions
           WHERE page_id = ?1
           ORDER BY date_time ASC
           LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![page_id_str, count, offset], |row| {
            row.get(0)
          })?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    ids
      .iter()
      .map(|s| crate::encode::decode_uuid(s).map_err(folio_core::Error::from))
      .collect()
  }

  async fn snapshot_at_or_before(
    &self,
    revision_id: Uuid,
  ) -> folio_core::Result<Snapshot> {
    let target = self
      .revision_row(revision_id)
      .await?
      .ok_or(Error::RevisionNotFound(revision_id))?;

    let page_id_str = target.page_id;
    let target_dt = target.date_time;

    let raw: Option<RawSnapshot> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT s.uuid, s.page, s.revision
               FROM snapshots s
               JOIN revisions r ON r.uuid = s.revision
               WHERE s.page = ?1 AND r.date_time <= ?2
               ORDER BY r.date_time DESC
               LIMIT 1",
              rusqlite::params![page_id_str, target_dt],
              |row| {
                Ok(RawSnapshot {
                  uuid:     row.get(0)?,
                  page:     row.get(1)?,
                  revision: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    let raw = raw.ok_or(Error::SnapshotNotFound(revision_id))?;
    Ok(raw.into_snapshot()?)
  }

  async fn revisions_between(
    &self,
    page_id: Uuid,
    after: DateTime<Utc>,
    until: DateTime<Utc>,
  ) -> folio_core::Result<Vec<Revision>> {
    let page_id_str = encode_uuid(page_id);
    let after_str = encode_dt(after);
    let until_str = encode_dt(until);

    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT uuid, page_id, date_time, author FROM revisions
           WHERE page_id = ?1 AND date_time > ?2 AND date_time <= ?3
           ORDER BY date_time ASC",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![page_id_str, after_str, until_str],
            |row| {
              Ok(RawRevision {
                uuid:      row.get(0)?,
                page_id:   row.get(1)?,
                date_time: row.get(2)?,
                author:    row.get(3)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    raws
      .into_iter()
      .map(|r| r.into_revision().map_err(folio_core::Error::from))
      .collect()
  }

  async fn count_revisions_after(
    &self,
    page_id: Uuid,
    after: DateTime<Utc>,
  ) -> folio_core::Result<u64> {
    let page_id_str = encode_uuid(page_id);
    let after_str = encode_dt(after);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM revisions
           WHERE page_id = ?1 AND date_time > ?2",
          rusqlite::params![page_id_str, after_str],
          |row| row.get(0),
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(count as u64)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn insert_page(
    &self,
    record: NewPageRecord,
  ) -> folio_core::Result<(Page, Revision, Snapshot)> {
    let date_time = Utc::now();

    let page_id_str = encode_uuid(record.page_id);
    let revision_id_str = encode_uuid(record.revision_id);
    let snapshot_id_str = encode_uuid(record.snapshot_id);
    let archive_date_str = record.archive_date.map(encode_date);
    let date_time_str = encode_dt(date_time);
    let slug = record.slug.clone();
    let name = record.name.clone();
    let author = record.author.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO pages (uuid, slug, name, archive_date) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![page_id_str, slug, name, archive_date_str],
        )?;
        tx.execute(
          "INSERT INTO revisions (uuid, page_id, date_time, author)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![revision_id_str, page_id_str, date_time_str, author],
        )?;
        tx.execute(
          "INSERT INTO snapshots (uuid, page, revision) VALUES (?1, ?2, ?3)",
          rusqlite::params![snapshot_id_str, page_id_str, revision_id_str],
        )?;
        tx.execute(
          "UPDATE pages SET last_revision_id = ?1 WHERE uuid = ?2",
          rusqlite::params![revision_id_str, page_id_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    let page = Page {
      uuid:             record.page_id,
      slug:             record.slug,
      name:             record.name,
      archive_date:     record.archive_date,
      last_revision_id: Some(record.revision_id),
      deleted_at:       None,
    };
    let revision = Revision {
      uuid:      record.revision_id,
      page_id:   record.page_id,
      date_time,
      author:    record.author,
    };
    let snapshot = Snapshot {
      uuid:     record.snapshot_id,
      page:     record.page_id,
      revision: record.revision_id,
    };

    Ok((page, revision, snapshot))
  }

  async fn insert_revision(
    &self,
    id: Uuid,
    page_id: Uuid,
    author: &str,
  ) -> folio_core::Result<Revision> {
    let date_time = self.next_date_time(page_id).await?;

    let id_str = encode_uuid(id);
    let page_id_str = encode_uuid(page_id);
    let date_time_str = encode_dt(date_time);
    let author_owned = author.to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO revisions (uuid, page_id, date_time, author)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, page_id_str, date_time_str, author_owned],
        )?;
        tx.execute(
          "UPDATE pages SET last_revision_id = ?1 WHERE uuid = ?2",
          rusqlite::params![id_str, page_id_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(Revision {
      uuid: id,
      page_id,
      date_time,
      author: author.to_owned(),
    })
  }

  async fn insert_snapshot(
    &self,
    id: Uuid,
    page_id: Uuid,
    revision_id: Uuid,
  ) -> folio_core::Result<Snapshot> {
    let id_str = encode_uuid(id);
    let page_id_str = encode_uuid(page_id);
    let revision_id_str = encode_uuid(revision_id);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO snapshots (uuid, page, revision) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, page_id_str, revision_id_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(Snapshot {
      uuid:     id,
      page:     page_id,
      revision: revision_id,
    })
  }

  async fn mark_page_deleted(&self, id: Uuid) -> folio_core::Result<DateTime<Utc>> {
    let deleted_at = Utc::now();
    let id_str = encode_uuid(id);
    let deleted_at_str = encode_dt(deleted_at);

    let changed: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE pages SET deleted_at = ?1
           WHERE uuid = ?2 AND deleted_at IS NULL",
          rusqlite::params![deleted_at_str, id_str],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await
      .map_err(Error::Database)?;

    if changed == 0 {
      return Err(Error::PageNotFound(id.to_string()).into());
    }
    Ok(deleted_at)
  }

  // ── Categories ────────────────────────────────────────────────────────────

  async fn create_category(&self, slug: &str) -> folio_core::Result<Category> {
    let slug_owned = slug.to_owned();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO categories (slug) VALUES (?1)",
          rusqlite::params![slug_owned],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::Database)?;

    Ok(Category { id, slug: slug.to_owned() })
  }

  async fn tag_page(&self, page_id: Uuid, category: &str) -> folio_core::Result<()> {
    let Some(category_id) = self.resolve_category(category).await? else {
      return Err(folio_core::Error::InvalidIdentifier(category.to_owned()));
    };

    let page_id_str = encode_uuid(page_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO page_categories (page_id, category_id)
           VALUES (?1, ?2)",
          rusqlite::params![page_id_str, category_id],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(())
  }
}
