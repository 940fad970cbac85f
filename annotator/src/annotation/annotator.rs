use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api::{annotate, config, default, log};
use actix_web::web::route;
use actix_web::{App, HttpServer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

pub struct Annotator;

impl Annotator {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        Self::initialize().await;
        let http_server = loop {
            let config = Config::now().await;
            let http_server = HttpServer::new(|| {
                let cors = actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .service(annotate::initialize())
                    .service(config::initialize())
                    .service(log::initialize())
                    .default_service(route().to(default::default_route))
            })
            .bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(SystemEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    async fn initialize() {
        let config = Config::now().await;
        let path = PathBuf::from(&config.working_folder);
        if let Err(err) = fs::create_dir_all(&path).await {
            logging_critical!(IOEntry::CreateDirectoryError(path.display(), err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        Self::cleanup().await;
        logging_information!(SystemEntry::TerminateComplete);
    }

    async fn cleanup() {
        logging_information!(SystemEntry::Cleaning);
        let config = Config::now().await;
        let path = PathBuf::from(&config.working_folder);
        if let Err(err) = fs::remove_dir_all(&path).await {
            logging_error!(IOEntry::DeleteDirectoryError(path.display(), err));
        }
        logging_information!(SystemEntry::CleanComplete);
    }
}
