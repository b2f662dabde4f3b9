/// Sniff an image MIME type from magic bytes. Non-image content yields `None`.
#[must_use]
pub fn detect_image_mime(data: &[u8]) -> Option<&'static str> {
    infer::get(data)
        .filter(|info| info.mime_type().starts_with("image/"))
        .map(|info| info.mime_type())
}

#[must_use]
pub fn mime_from_extension(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// File extension used for stored objects of this type.
#[must_use]
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/png" => "png",
        _ => "bin",
    }
}
