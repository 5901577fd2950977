use url::Url;

/// Path fragments that mark a URL as a product page
const PRODUCT_PATH_MARKERS: &[&str] = &["/product/", "/item/", "/p/", "/products/"];

/// Classifies a URL as a product page by its path
///
/// Returns true iff the URL's path contains any of the product markers as a
/// literal substring. Purely a string predicate; query and fragment are
/// ignored, and an unparseable URL is never a product.
///
/// # Examples
///
/// ```
/// use shopmap::url::is_product_url;
///
/// assert!(is_product_url("https://shop.example.com/products/123"));
/// assert!(is_product_url("https://shop.example.com/item/abc"));
/// assert!(!is_product_url("https://shop.example.com/about"));
/// ```
pub fn is_product_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = parsed.path();
    PRODUCT_PATH_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
}
