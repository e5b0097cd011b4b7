#[cfg(test)]
mod tests {
    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tandang_core::domain::Category;
    use tandang_core::ports::PostRepository;

    fn model(slug: &str, category: &str) -> post::Model {
        post::Model {
            id: uuid::Uuid::new_v4(),
            title: "NOISE ARCHITECTURE".to_owned(),
            slug: slug.to_owned(),
            category: category.to_owned(),
            excerpt: "Exploring the brutalist sounds.".to_owned(),
            content: "# body".to_owned(),
            cover_image_url: Some("https://cdn.test/media/x.png".to_owned()),
            is_published: true,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model("noise-architecture", "Musik")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let found = repo.find_by_slug("noise-architecture").await.unwrap();

        let found = found.expect("post should be found");
        assert_eq!(found.slug, "noise-architecture");
        assert_eq!(found.category, Category::Musik);
        assert!(found.is_published);
    }

    #[tokio::test]
    async fn test_find_post_by_slug_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_published_maps_rows_in_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                model("newest", "Visual"),
                model("older", "Event"),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let posts = repo.recent_published(6).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "newest");
        assert_eq!(posts[1].slug, "older");
        assert_eq!(posts[1].category, Category::Event);
    }

    #[tokio::test]
    async fn test_unknown_category_falls_back_to_default() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model("legacy", "Design")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let found = repo.find_by_slug("legacy").await.unwrap().unwrap();
        assert_eq!(found.category, Category::Musik);
    }
}
