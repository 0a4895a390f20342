use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::config::{FetchConfig, OntologyMap};
use crate::domain::{Acronym, LodeEndpoint};
use crate::error::LodeError;
use crate::lode::LodeClient;
use crate::output::write_document;
use crate::rewrite::RewritePipeline;

#[derive(Debug, Clone, Serialize)]
pub struct ProduceReport {
    pub documents: Vec<DocumentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub acronym: String,
    pub request_url: String,
    pub status: u16,
    pub path: String,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Fetches every configured ontology from LODE and stores the rewritten page
/// as `<output_dir>/<acronym>.html`.
pub struct DocumentationFetcher<C: LodeClient> {
    client: C,
    output_dir: Utf8PathBuf,
    endpoint: LodeEndpoint,
    pipeline: RewritePipeline,
    ontologies: OntologyMap,
}

impl<C: LodeClient> DocumentationFetcher<C> {
    pub fn new(
        client: C,
        config: &FetchConfig,
        ontologies: OntologyMap,
    ) -> Result<Self, LodeError> {
        Ok(Self {
            client,
            output_dir: config.output_dir.clone(),
            endpoint: config.endpoint(),
            pipeline: RewritePipeline::from_config(config)?,
            ontologies,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Processes entries one at a time and stops at the first failure.
    pub fn produce(&self, sink: &dyn ProgressSink) -> Result<ProduceReport, LodeError> {
        let mut documents = Vec::with_capacity(self.ontologies.len());
        for (acronym, ontology_url) in self.ontologies.iter() {
            documents.push(self.produce_one(acronym, ontology_url, sink)?);
        }
        Ok(ProduceReport { documents })
    }

    fn produce_one(
        &self,
        acronym: &Acronym,
        ontology_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<DocumentReport, LodeError> {
        let started = Instant::now();
        sink.event(ProgressEvent {
            message: format!("Prepare the documentation of '{acronym}'"),
            elapsed: None,
        });

        let request_url = self.endpoint.request_url(ontology_url);
        tracing::info!(%acronym, url = %request_url, "requesting documentation");
        let response = self.client.fetch(&request_url)?;
        if !response.is_success() {
            tracing::warn!(
                %acronym,
                status = response.status,
                "LODE returned a non-success status, keeping the body"
            );
        }

        let document = self.pipeline.apply(&response.body);
        let path = write_document(&self.output_dir, acronym, &document)?;
        tracing::debug!(%acronym, %path, bytes = document.len(), "documentation written");

        sink.event(ProgressEvent {
            message: "\t ... done!".to_string(),
            elapsed: Some(started.elapsed()),
        });

        Ok(DocumentReport {
            acronym: acronym.to_string(),
            request_url,
            status: response.status,
            path: path.to_string(),
            bytes: document.len(),
        })
    }
}
