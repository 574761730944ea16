use crate::{
    error::AppResult,
    models::{Movie, Page, PageRequest, PER_PAGE},
    services::access::MovieCatalog,
};

/// One page of the catalog in ascending id order
pub async fn browse_catalog(
    catalog: &dyn MovieCatalog,
    request: PageRequest,
) -> AppResult<Page<Movie>> {
    let (movies, total) = catalog.fetch_movie_page(request.offset(), PER_PAGE).await?;
    tracing::debug!(page = request.page(), total, "Catalog page fetched");
    Ok(Page::new(movies, request, total))
}
