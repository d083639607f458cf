//! In-process image repository
//!
//! Used when no `DATABASE_URL` is configured in development, and by tests.
//! All mutation happens under one write lock, so increments never race.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{Image, ImageCreate};
use shared::{ListQuery, SortBy, SortOrder};
use tokio::sync::RwLock;

use super::{ImageRepository, RepoResult, SEED_AI_MODEL, SEED_TAGS};

/// A record plus its insertion sequence, the final tie-breaker when sorting
#[derive(Debug, Clone)]
struct Row {
    seq: u64,
    image: Image,
}

#[derive(Default)]
struct Store {
    rows: HashMap<String, Row>,
    next_seq: u64,
}

impl Store {
    fn put(&mut self, image: Image) {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.rows.insert(image.id.clone(), Row { seq, image });
    }

    fn live(&self) -> impl Iterator<Item = &Row> {
        self.rows.values().filter(|r| !r.image.is_deleted)
    }

    fn live_mut(&mut self, id: &str) -> Option<&mut Image> {
        self.rows
            .get_mut(id)
            .map(|r| &mut r.image)
            .filter(|i| !i.is_deleted)
    }
}

#[derive(Default)]
pub struct MemoryImageRepository {
    store: RwLock<Store>,
}

impl MemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record as-is (fixtures, soft-deleted rows)
    pub async fn insert(&self, image: Image) {
        self.store.write().await.put(image);
    }
}

fn compare(a: &Row, b: &Row, sort_by: SortBy) -> Ordering {
    let (x, y) = (&a.image, &b.image);
    let primary = match sort_by {
        SortBy::CreatedAt => x.created_at.cmp(&y.created_at),
        SortBy::Likes => x.likes.cmp(&y.likes),
        SortBy::FileName => x.file_name.cmp(&y.file_name),
    };
    primary.then_with(|| a.seq.cmp(&b.seq))
}

#[async_trait]
impl ImageRepository for MemoryImageRepository {
    async fn list(&self, query: &ListQuery) -> RepoResult<Vec<Image>> {
        let store = self.store.read().await;
        let mut rows: Vec<&Row> = store.live().collect();

        rows.sort_by(|a, b| match query.sort_order {
            SortOrder::Asc => compare(a, b, query.sort_by),
            SortOrder::Desc => compare(b, a, query.sort_by),
        });

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = query
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);

        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|r| r.image.clone())
            .collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.store.read().await.live().count() as i64)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Image>> {
        let store = self.store.read().await;
        Ok(store
            .rows
            .get(id)
            .map(|r| &r.image)
            .filter(|i| !i.is_deleted)
            .cloned())
    }

    async fn create(&self, data: ImageCreate) -> RepoResult<Image> {
        let image = Image {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: data.file_name,
            uri: data.uri,
            title: data.title,
            prompts: data.prompts,
            description: data.description,
            ai_model: data.ai_model,
            tags: data.tags,
            created_at: shared::util::now_millis(),
            likes: 0,
            is_deleted: false,
        };
        self.store.write().await.put(image.clone());
        Ok(image)
    }

    async fn increment_likes(&self, id: &str) -> RepoResult<Option<i64>> {
        let mut store = self.store.write().await;
        Ok(store.live_mut(id).map(|image| {
            image.likes += 1;
            image.likes
        }))
    }

    async fn seed_test_metadata(&self) -> RepoResult<u64> {
        let mut store = self.store.write().await;
        let mut modified = 0;
        for row in store.rows.values_mut().filter(|r| !r.image.is_deleted) {
            row.image.tags = SEED_TAGS.iter().map(|t| t.to_string()).collect();
            row.image.ai_model = Some(SEED_AI_MODEL.to_string());
            modified += 1;
        }
        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: &str, file_name: &str, created_at: i64, likes: i64) -> Image {
        Image {
            id: id.into(),
            file_name: file_name.into(),
            uri: format!("memory://gallery/images/{file_name}"),
            title: None,
            prompts: None,
            description: None,
            ai_model: None,
            tags: vec![],
            created_at,
            likes,
            is_deleted: false,
        }
    }

    async fn seeded() -> MemoryImageRepository {
        let repo = MemoryImageRepository::new();
        repo.insert(fixture("a", "cat.png", 100, 5)).await;
        repo.insert(fixture("b", "apple.png", 300, 1)).await;
        repo.insert(fixture("c", "bird.png", 200, 5)).await;
        let mut gone = fixture("d", "deleted.png", 400, 99);
        gone.is_deleted = true;
        repo.insert(gone).await;
        repo
    }

    fn ids(rows: &[Image]) -> Vec<&str> {
        rows.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let repo = seeded().await;
        let rows = repo.list(&ListQuery::default()).await.unwrap();
        assert_eq!(ids(&rows), ["b", "c", "a"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_likes_ties_break_on_insertion_order_in_both_directions() {
        let repo = seeded().await;
        let desc = repo
            .list(&ListQuery::default().sorted(SortBy::Likes, SortOrder::Desc))
            .await
            .unwrap();
        let asc = repo
            .list(&ListQuery::default().sorted(SortBy::Likes, SortOrder::Asc))
            .await
            .unwrap();
        assert_eq!(ids(&desc), ["c", "a", "b"]);
        assert_eq!(ids(&asc), ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let repo = seeded().await;
        let rows = repo
            .list(&ListQuery::new(Some(1), 1).sorted(SortBy::FileName, SortOrder::Asc))
            .await
            .unwrap();
        assert_eq!(ids(&rows), ["c"]);

        let rows = repo.list(&ListQuery::new(Some(10), 5)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_soft_deleted_is_invisible() {
        let repo = seeded().await;
        assert!(repo.find_by_id("d").await.unwrap().is_none());
        assert_eq!(repo.increment_likes("d").await.unwrap(), None);
        assert_eq!(repo.seed_test_metadata().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_and_like() {
        let repo = MemoryImageRepository::new();
        let image = repo
            .create(ImageCreate {
                file_name: "sunset.png".into(),
                uri: "memory://gallery/images/x.png".into(),
                title: Some("Sunset".into()),
                tags: vec!["#test".into()],
                ..ImageCreate::default()
            })
            .await
            .unwrap();
        assert_eq!(image.likes, 0);
        assert!(!image.is_deleted);

        assert_eq!(repo.increment_likes(&image.id).await.unwrap(), Some(1));
        assert_eq!(repo.increment_likes(&image.id).await.unwrap(), Some(2));
        assert_eq!(repo.increment_likes("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_same_millisecond_keeps_newest_first() {
        let repo = MemoryImageRepository::new();
        for id in ["z", "m", "a", "q"] {
            repo.insert(fixture(id, &format!("{id}.png"), 1_000, 0)).await;
        }
        let rows = repo.list(&ListQuery::default()).await.unwrap();
        assert_eq!(ids(&rows), ["q", "a", "m", "z"]);

        let rows = repo
            .list(&ListQuery::default().sorted(SortBy::CreatedAt, SortOrder::Asc))
            .await
            .unwrap();
        assert_eq!(ids(&rows), ["z", "m", "a", "q"]);
    }
}
