use std::future::Future;

use tracing::debug;

use crate::error::Result;
use crate::spotify::models::Page;

/// Walk an offset/limit paging endpoint from offset 0 until the server returns
/// an empty page or a page without a `next` cursor.
pub async fn collect_pages<T, F, Fut>(limit: u32, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch_page(limit, offset).await?;
        debug!("Fetched page at offset {} ({} items)", offset, page.items.len());

        if page.items.is_empty() {
            break;
        }

        let last_page = page.next.is_none();
        items.extend(page.items);

        if last_page {
            break;
        }
        offset += limit;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn page(items: &[u32], has_next: bool) -> Page<u32> {
        Page {
            items: items.to_vec(),
            next: has_next.then(|| "https://api.spotify.com/v1/next".to_string()),
        }
    }

    #[tokio::test]
    async fn test_concatenates_pages_until_null_cursor() {
        let pages = vec![page(&[1, 2, 3], true), page(&[4, 5, 6], true), page(&[7], false)];
        let mut offsets = Vec::new();

        let items = collect_pages(3, |_limit, offset| {
            offsets.push(offset);
            let result = pages[(offset / 3) as usize].clone();
            async move { Ok(result) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(offsets, vec![0, 3, 6]);
    }

    #[tokio::test]
    async fn test_stops_on_empty_page_even_with_cursor() {
        let pages = vec![page(&[1, 2], true), page(&[3, 4], true), page(&[], true)];
        let mut calls = 0;

        let items = collect_pages(2, |_limit, offset| {
            calls += 1;
            let result = pages[(offset / 2) as usize].clone();
            async move { Ok(result) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_passes_fixed_limit() {
        let mut limits = Vec::new();

        let items: Vec<u32> = collect_pages(50, |limit, _offset| {
            limits.push(limit);
            async move { Ok(page(&[], false)) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(limits, vec![50]);
    }

    #[tokio::test]
    async fn test_propagates_page_error() {
        let result: Result<Vec<u32>> = collect_pages(10, |_limit, offset| async move {
            if offset == 0 {
                Ok(page(&[1], true))
            } else {
                Err(AppError::CatalogApi("500 Internal Server Error".into()))
            }
        })
        .await;

        assert!(matches!(result, Err(AppError::CatalogApi(_))));
    }
}
