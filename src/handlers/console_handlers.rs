//! HTTP handlers for the console's form endpoints.
//!
//! Each handler extracts its parameters, makes exactly one `StorageService`
//! call, and either redirects back to a view or lets `AppError` render the
//! error page. No state survives the request.

use axum::{
    Form,
    extract::{Multipart, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use bytes::Bytes;
use serde::Deserialize;

use crate::{errors::AppError, services::storage_service::StorageService, views};

#[derive(Debug, Deserialize)]
pub struct FolderForm {
    pub bucket_name: String,
    pub folder_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteObjectForm {
    pub bucket_name: String,
    pub object_key: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveFileForm {
    pub source_bucket: String,
    pub destination_bucket: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct BucketForm {
    pub bucket_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileForm {
    pub bucket_name: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub bucket_name: String,
}

/// `GET /`: the console's form index.
pub async fn index() -> Html<String> {
    Html(views::index_page())
}

/// `POST /create_folder`: write the zero-byte `folder_name/` marker.
pub async fn create_folder(
    State(service): State<StorageService>,
    Form(form): Form<FolderForm>,
) -> Result<Redirect, AppError> {
    service
        .create_folder(&form.bucket_name, &form.folder_name)
        .await
        .map_err(|err| {
            AppError::from(err)
                .with_hint("Could not create the folder; check that the bucket exists")
        })?;
    Ok(Redirect::to("/"))
}

/// `POST /delete_folder`: remove the `folder_name/` marker.
pub async fn delete_folder(
    State(service): State<StorageService>,
    Form(form): Form<FolderForm>,
) -> Result<Redirect, AppError> {
    service
        .delete_folder(&form.bucket_name, &form.folder_name)
        .await
        .map_err(|err| AppError::from(err).with_hint("Bucket doesn't exist"))?;
    Ok(Redirect::to("/"))
}

/// `POST /delete_object`: delete one key, back to the index.
pub async fn delete_object(
    State(service): State<StorageService>,
    Form(form): Form<DeleteObjectForm>,
) -> Result<Redirect, AppError> {
    service
        .delete_object(&form.bucket_name, &form.object_key)
        .await?;
    Ok(Redirect::to("/"))
}

/// `POST /move_file`: copy to the destination bucket, then delete from the
/// source.
pub async fn move_file(
    State(service): State<StorageService>,
    Form(form): Form<MoveFileForm>,
) -> Result<Redirect, AppError> {
    service
        .move_object(
            &form.source_bucket,
            &form.destination_bucket,
            &form.file_name,
        )
        .await?;
    Ok(Redirect::to("/"))
}

/// `GET /list_s3?bucket_name=...`: render one page of bucket contents.
pub async fn list_objects(
    State(service): State<StorageService>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let listing = service.list_objects(&query.bucket_name).await?;
    Ok(Html(views::listing_page(&listing)))
}

/// `POST /create_bucket`: create a bucket in the configured region.
pub async fn create_bucket(
    State(service): State<StorageService>,
    Form(form): Form<BucketForm>,
) -> Result<Redirect, AppError> {
    service.create_bucket(&form.bucket_name).await?;
    Ok(Redirect::to("/"))
}

/// `POST /delete_bucket`: empty the bucket, then delete it.
pub async fn delete_bucket(
    State(service): State<StorageService>,
    Form(form): Form<BucketForm>,
) -> Result<Redirect, AppError> {
    service.delete_bucket(&form.bucket_name).await?;
    Ok(Redirect::to("/"))
}

/// `POST /upload_file`: multipart upload stored under the original
/// filename, then redirect to that bucket's listing.
pub async fn upload_file(
    State(service): State<StorageService>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut bucket_name: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("bucket_name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::bad_request(err.to_string()))?;
                bucket_name = Some(value);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::bad_request("uploaded file has no filename"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::bad_request(err.to_string()))?;
                file = Some((file_name, data));
            }
            _ => {}
        }
    }

    let bucket = bucket_name
        .ok_or_else(|| AppError::bad_request("missing `bucket_name` field in upload form"))?;
    let (file_name, data) =
        file.ok_or_else(|| AppError::bad_request("missing `file` field in upload form"))?;

    service.upload_object(&bucket, &file_name, data).await?;
    Ok(Redirect::to(&format!("/list_s3?bucket_name={}", bucket)))
}

/// `POST /delete_file`: delete one object, then redirect to that bucket's
/// listing.
pub async fn delete_file(
    State(service): State<StorageService>,
    Form(form): Form<DeleteFileForm>,
) -> Result<Redirect, AppError> {
    service
        .delete_object(&form.bucket_name, &form.file_name)
        .await?;
    Ok(Redirect::to(&format!(
        "/list_s3?bucket_name={}",
        form.bucket_name
    )))
}

/// Fallback for unmatched routes: the static error page with a 404.
pub async fn not_found() -> impl IntoResponse {
    AppError::not_found("404 Not Found")
}
