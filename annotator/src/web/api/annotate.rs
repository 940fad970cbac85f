use crate::annotation::detector::{self, UltralyticsDetector};
use crate::annotation::pipeline;
use crate::annotation::session::Session;
use crate::utils::config::Config;
use crate::utils::logging::*;
use actix_files::NamedFile;
use actix_multipart::{Field, Multipart};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, Scope, get, post, web};
use futures::{StreamExt, TryStreamExt};
use sanitize_filename::sanitize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::task::spawn_blocking;
use uuid::Uuid;

const ARCHIVE_FILE_NAME: &str = "results.zip";

pub fn initialize() -> Scope {
    web::scope("/annotate")
        .service(annotate)
        .service(download_result)
}

#[post("")]
async fn annotate(req: HttpRequest, payload: Multipart) -> impl Responder {
    let (label, files) = match collect_payload(payload).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };
    let config = Config::now().await;
    let detector = UltralyticsDetector::from_config(&config);
    //The label resolves before anything touches the disk.
    let class_id = match detector::resolve_class_id(&detector, &label) {
        Some(class_id) => class_id,
        None => {
            let entry = warning_entry!(TaskEntry::UnknownLabel(label.clone()));
            let message = entry.message.clone();
            logging_entry!(entry);
            return HttpResponse::UnprocessableEntity().json(json!({ "error": message }));
        }
    };
    let session = match Session::create(Path::new(&config.working_folder)).await {
        Ok(session) => session,
        Err(entry) => return error_response(entry).await,
    };
    let request_id = session.uuid;
    logging_information!(request_id, format!("Annotating {} images with label '{label}'", files.len()), "");
    if let Err(entry) = save_files(&session, &files).await {
        return request_error_response(request_id, entry).await;
    }
    let result = spawn_blocking(move || {
        pipeline::process_session(&session, &detector, class_id, &label)
    }).await;
    let archive_path = match result {
        Ok(Ok(archive_path)) => archive_path,
        Ok(Err(entry)) => return request_error_response(request_id, entry).await,
        Err(err) => {
            let entry = error_entry!(SystemEntry::TaskPanickedError(err));
            return request_error_response(request_id, entry).await;
        }
    };
    logging_information!(request_id, "Annotation archive ready", "");
    serve_archive(&req, &archive_path).await
}

#[get("/download/{request_id}")]
async fn download_result(req: HttpRequest, request_id: web::Path<Uuid>) -> impl Responder {
    let config = Config::now().await;
    let request_id = request_id.into_inner();
    let session = Session::open(Path::new(&config.working_folder), request_id);
    match session {
        Some(session) if session.archive_path().is_file() => {
            serve_archive(&req, &session.archive_path()).await
        }
        _ => {
            let message = String::from(TaskEntry::ArchiveNotFound(request_id));
            HttpResponse::NotFound().json(json!({ "error": message }))
        }
    }
}

async fn serve_archive(req: &HttpRequest, archive_path: &PathBuf) -> HttpResponse {
    match NamedFile::open_async(archive_path).await {
        Ok(named_file) => {
            let content_disposition = ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![
                    DispositionParam::Filename(ARCHIVE_FILE_NAME.to_string()),
                ],
            };
            named_file
                .set_content_disposition(content_disposition)
                .set_content_type(mime_guess::from_path(archive_path).first_or_octet_stream())
                .into_response(req)
        }
        Err(err) => {
            let entry = error_entry!(IOEntry::ReadFileError(archive_path.display(), err));
            error_response(entry).await
        }
    }
}

async fn collect_payload(mut payload: Multipart) -> Result<(String, Vec<(String, Vec<u8>)>), HttpResponse> {
    let mut label = None;
    let mut files = Vec::new();
    while let Ok(Some(mut field)) = payload.try_next().await {
        let (field_name, file_name) = match field_names(&field) {
            Some(names) => names,
            None => return Err(HttpResponse::BadRequest().body("Invalid payload.")),
        };
        if field_name == "label" {
            label = parse_label(&mut field).await;
        } else {
            let file_name = match file_name {
                Some(file_name) => sanitize(file_name),
                None => return Err(HttpResponse::BadRequest().body("Invalid payload.")),
            };
            if file_name.is_empty() {
                return Err(HttpResponse::BadRequest().body("Invalid filename."));
            }
            let file_extension = Path::new(&file_name).extension()
                .and_then(|os_str| os_str.to_str()).unwrap_or("");
            match file_extension {
                "png" | "jpg" | "jpeg" => {}
                _ => return Err(HttpResponse::BadRequest().body("Invalid file type or extension.")),
            }
            match read_file_field(&mut field).await {
                Ok(data) => files.push((file_name, data)),
                Err(_) => return Err(HttpResponse::BadRequest().body("Invalid payload.")),
            }
        }
    }
    let label = match label {
        Some(label) => label,
        None => {
            let message = String::from(TaskEntry::MissingLabelField);
            return Err(HttpResponse::BadRequest().json(json!({ "error": message })));
        }
    };
    if files.is_empty() {
        let message = String::from(TaskEntry::EmptyBatch);
        return Err(HttpResponse::BadRequest().json(json!({ "error": message })));
    }
    Ok((label, files))
}

fn field_names(field: &Field) -> Option<(String, Option<String>)> {
    let content_disposition = field.content_disposition()?;
    let field_name = content_disposition.get_name()?.to_string();
    let file_name = content_disposition.get_filename().map(|file_name| file_name.to_string());
    Some((field_name, file_name))
}

async fn parse_label(field: &mut Field) -> Option<String> {
    let data = field.next().await?.ok()?;
    Some(String::from_utf8_lossy(&data).to_string())
}

async fn read_file_field(field: &mut Field) -> Result<Vec<u8>, ()> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|_| ())?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn save_files(session: &Session, files: &[(String, Vec<u8>)]) -> Result<(), LogEntry> {
    for (file_name, data) in files {
        let file_path = session.images_folder().join(file_name);
        let mut file = File::create(&file_path).await
            .map_err(|err| error_entry!(IOEntry::CreateFileError(file_path.display(), err)))?;
        file.write_all(data).await
            .map_err(|err| error_entry!(IOEntry::WriteFileError(file_path.display(), err)))?;
    }
    Ok(())
}

async fn error_response(entry: LogEntry) -> HttpResponse {
    let message = entry.message.clone();
    logging_entry!(entry);
    HttpResponse::InternalServerError().json(json!({ "error": message }))
}

async fn request_error_response(request_id: Uuid, entry: LogEntry) -> HttpResponse {
    let message = entry.message.clone();
    logging_entry!(request_id, entry);
    HttpResponse::InternalServerError().json(json!({ "error": message }))
}
