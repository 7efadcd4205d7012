use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{paths, PaperUpload, ResearchApi, UPLOAD_FIELD};
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{
    AnswerResponse, CompareRequest, GroupCreate, GroupList, GroupUpdate, Health, Paper, PaperGroup, PaperList,
    QuestionRequest, UploadReceipt,
};

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// reqwest-backed [`ResearchApi`] for native callers.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }
}

/// Turns a non-2xx response into `ClientError::Status` carrying its detail.
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "API call failed");
    Err(ClientError::from_status(status.as_u16(), &body))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    check(resp)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl ResearchApi for HttpApi {
    type File = PaperUpload;

    async fn list_papers(&self) -> Result<Vec<Paper>, ClientError> {
        let resp = self.client.get(self.url(paths::LIST_PAPERS)).send().await?;
        Ok(decode::<PaperList>(resp).await?.papers)
    }

    async fn upload_paper(&self, file: &PaperUpload) -> Result<UploadReceipt, ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        let resp = self
            .client
            .post(self.url(paths::UPLOAD_PAPER))
            .multipart(form)
            .send()
            .await?;
        decode(resp).await
    }

    async fn delete_paper(&self, paper_id: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.url(&paths::delete_paper(paper_id)))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    async fn list_groups(&self) -> Result<Vec<PaperGroup>, ClientError> {
        let resp = self.client.get(self.url(paths::GROUPS)).send().await?;
        Ok(decode::<GroupList>(resp).await?.groups)
    }

    async fn create_group(&self, group: &GroupCreate) -> Result<PaperGroup, ClientError> {
        let resp = self
            .client
            .post(self.url(paths::GROUPS))
            .json(group)
            .send()
            .await?;
        decode(resp).await
    }

    async fn update_group(
        &self,
        group_id: &str,
        update: &GroupUpdate,
    ) -> Result<PaperGroup, ClientError> {
        let resp = self
            .client
            .put(self.url(&paths::group(group_id)))
            .json(update)
            .send()
            .await?;
        decode(resp).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.url(&paths::group(group_id)))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    async fn add_papers_to_group(
        &self,
        group_id: &str,
        paper_ids: &[String],
    ) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.url(&paths::group_papers(group_id)))
            .json(paper_ids)
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    async fn remove_paper_from_group(
        &self,
        group_id: &str,
        paper_id: &str,
    ) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.url(&paths::group_paper(group_id, paper_id)))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    async fn ask_question(&self, request: &QuestionRequest) -> Result<AnswerResponse, ClientError> {
        let resp = self
            .client
            .post(self.url(paths::ASK_QUESTION))
            .json(request)
            .send()
            .await?;
        decode(resp).await
    }

    async fn compare_papers(
        &self,
        request: &CompareRequest,
    ) -> Result<AnswerResponse, ClientError> {
        let resp = self
            .client
            .post(self.url(paths::COMPARE_PAPERS))
            .query(&request.query())
            .json(&request.paper_ids)
            .send()
            .await?;
        decode(resp).await
    }

    async fn health(&self) -> Result<Health, ClientError> {
        let resp = self.client.get(self.url(paths::HEALTH)).send().await?;
        decode(resp).await
    }
}
