use axum::response::Html;

use crate::present::PAGE_HTML;

pub async fn index_page() -> Html<&'static str> {
    Html(PAGE_HTML)
}
