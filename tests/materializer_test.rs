//! Tests for fetching and mirroring remote resources

mod common;

use common::{create_css_mock, create_error_mock, create_html_mock, create_test_dir, test_config};
use critical_css_generator::{GeneratorConfig, GeneratorError, ResourceKind, ResourceMaterializer};
use mockito::Server;
use url::Url;

#[tokio::test]
async fn test_materialize_page() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = create_html_mock(&mut server, "/blog/post", "<html><body>post</body></html>");

    let dir = create_test_dir()?;
    let materializer = ResourceMaterializer::new(&test_config(dir.path()))?;
    let url = Url::parse(&format!("{}/blog/post", server.url()))?;

    let page = materializer.materialize_page(&url).await?;

    assert_eq!(page.path, dir.path().join("127.0.0.1/temp.html"));
    assert_eq!(page.html, "<html><body>post</body></html>");
    assert_eq!(std::fs::read_to_string(&page.path)?, page.html);
    Ok(())
}

#[tokio::test]
async fn test_materialize_stylesheet_drops_query() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = create_css_mock(&mut server, "/static/file.css?v=2", "p{}");

    let dir = create_test_dir()?;
    let materializer = ResourceMaterializer::new(&test_config(dir.path()))?;
    let url = Url::parse(&format!("{}/static/file.css?v=2", server.url()))?;

    let path = materializer.materialize_stylesheet(&url).await?;

    assert_eq!(path, dir.path().join("127.0.0.1/css/file.css"));
    assert_eq!(std::fs::read_to_string(path)?, "p{}");
    Ok(())
}

#[tokio::test]
async fn test_materialize_overwrites_existing_file() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = create_css_mock(&mut server, "/app.css", "new{}");

    let dir = create_test_dir()?;
    let existing = dir.path().join("127.0.0.1/css/app.css");
    std::fs::create_dir_all(existing.parent().unwrap())?;
    std::fs::write(&existing, "old{}")?;

    let materializer = ResourceMaterializer::new(&test_config(dir.path()))?;
    let url = Url::parse(&format!("{}/app.css", server.url()))?;
    materializer.materialize_stylesheet(&url).await?;

    assert_eq!(std::fs::read_to_string(existing)?, "new{}");
    Ok(())
}

#[tokio::test]
async fn test_trailing_slash_falls_back_to_index_css() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = create_css_mock(&mut server, "/styles/", "body{}");

    let dir = create_test_dir()?;
    let materializer = ResourceMaterializer::new(&test_config(dir.path()))?;
    let url = Url::parse(&format!("{}/styles/", server.url()))?;

    let path = materializer.materialize_stylesheet(&url).await?;
    assert_eq!(path, dir.path().join("127.0.0.1/css/index.css"));
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_fetch_error() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = create_error_mock(&mut server, "/missing.css", 404);

    let dir = create_test_dir()?;
    let materializer = ResourceMaterializer::new(&test_config(dir.path()))?;
    let url = Url::parse(&format!("{}/missing.css", server.url()))?;

    let err = materializer.materialize_stylesheet(&url).await.unwrap_err();

    match err {
        GeneratorError::Fetch { url: failed, message } => {
            assert!(failed.ends_with("/missing.css"));
            assert!(message.contains("404"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert!(!dir.path().join("127.0.0.1/css/missing.css").exists());
    Ok(())
}

#[tokio::test]
async fn test_stylesheet_size_limit() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = create_css_mock(&mut server, "/big.css", &"a{}".repeat(100));

    let dir = create_test_dir()?;
    let config = GeneratorConfig::builder()
        .domain_root(dir.path())
        .max_stylesheet_size(64)
        .build()?;
    let materializer = ResourceMaterializer::new(&config)?;
    let url = Url::parse(&format!("{}/big.css", server.url()))?;

    let err = materializer
        .fetch(&url, ResourceKind::Stylesheet)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("limit"));
    Ok(())
}
