use std::sync::OnceLock;

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::FormData;

use research_assistant::api::{paths, UPLOAD_FIELD};
use research_assistant::config::DEFAULT_API_BASE;
use research_assistant::models::{
    AnswerResponse, CompareRequest, GroupCreate, GroupList, GroupUpdate, Health, Paper,
    PaperGroup, PaperList, QuestionRequest, UploadReceipt,
};
use research_assistant::{ClientConfig, ClientError, ResearchApi, UploadFile};

/// API location, fixed at build time via `RESEARCH_API_URL`.
fn api_config() -> &'static ClientConfig {
    static CONFIG: OnceLock<ClientConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        ClientConfig::new(option_env!("RESEARCH_API_URL").unwrap_or(DEFAULT_API_BASE))
    })
}

/// A file picked from the input or dropped on the upload zone. Posted as-is,
/// without reading it into memory.
pub struct PdfFile(pub web_sys::File);

impl UploadFile for PdfFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn content_type(&self) -> String {
        self.0.type_()
    }
}

/// gloo-net backed [`ResearchApi`].
#[derive(Debug, Clone, Copy)]
pub struct BrowserApi {
    config: &'static ClientConfig,
}

impl BrowserApi {
    pub fn new() -> Self {
        Self {
            config: api_config(),
        }
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }
}

impl Default for BrowserApi {
    fn default() -> Self {
        Self::new()
    }
}

fn network(e: gloo_net::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

/// Non-2xx responses become `ClientError::Status` with the server's detail.
async fn check(resp: Response) -> Result<Response, ClientError> {
    if resp.ok() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::from_status(resp.status(), &body))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    check(resp)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl ResearchApi for BrowserApi {
    type File = PdfFile;

    async fn list_papers(&self) -> Result<Vec<Paper>, ClientError> {
        let resp = Request::get(&self.url(paths::LIST_PAPERS))
            .send()
            .await
            .map_err(network)?;
        Ok(decode::<PaperList>(resp).await?.papers)
    }

    async fn upload_paper(&self, file: &PdfFile) -> Result<UploadReceipt, ClientError> {
        let form = FormData::new()
            .map_err(|e| ClientError::Network(format!("FormData unavailable: {e:?}")))?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &file.0, &file.0.name())
            .map_err(|e| ClientError::Network(format!("Could not attach file: {e:?}")))?;

        let resp = Request::post(&self.url(paths::UPLOAD_PAPER))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(resp).await
    }

    async fn delete_paper(&self, paper_id: &str) -> Result<(), ClientError> {
        let resp = Request::delete(&self.url(&paths::delete_paper(paper_id)))
            .send()
            .await
            .map_err(network)?;
        check(resp).await.map(drop)
    }

    async fn list_groups(&self) -> Result<Vec<PaperGroup>, ClientError> {
        let resp = Request::get(&self.url(paths::GROUPS))
            .send()
            .await
            .map_err(network)?;
        Ok(decode::<GroupList>(resp).await?.groups)
    }

    async fn create_group(&self, group: &GroupCreate) -> Result<PaperGroup, ClientError> {
        let resp = Request::post(&self.url(paths::GROUPS))
            .json(group)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(resp).await
    }

    async fn update_group(
        &self,
        group_id: &str,
        update: &GroupUpdate,
    ) -> Result<PaperGroup, ClientError> {
        let resp = Request::put(&self.url(&paths::group(group_id)))
            .json(update)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(resp).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), ClientError> {
        let resp = Request::delete(&self.url(&paths::group(group_id)))
            .send()
            .await
            .map_err(network)?;
        check(resp).await.map(drop)
    }

    async fn add_papers_to_group(
        &self,
        group_id: &str,
        paper_ids: &[String],
    ) -> Result<(), ClientError> {
        let resp = Request::post(&self.url(&paths::group_papers(group_id)))
            .json(&paper_ids)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        check(resp).await.map(drop)
    }

    async fn remove_paper_from_group(
        &self,
        group_id: &str,
        paper_id: &str,
    ) -> Result<(), ClientError> {
        let resp = Request::delete(&self.url(&paths::group_paper(group_id, paper_id)))
            .send()
            .await
            .map_err(network)?;
        check(resp).await.map(drop)
    }

    async fn ask_question(&self, request: &QuestionRequest) -> Result<AnswerResponse, ClientError> {
        let resp = Request::post(&self.url(paths::ASK_QUESTION))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(resp).await
    }

    async fn compare_papers(
        &self,
        request: &CompareRequest,
    ) -> Result<AnswerResponse, ClientError> {
        let resp = Request::post(&self.url(paths::COMPARE_PAPERS))
            .query([
                ("question", request.question.as_str()),
                ("mode", request.mode.as_str()),
            ])
            .json(&request.paper_ids)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(resp).await
    }

    async fn health(&self) -> Result<Health, ClientError> {
        let resp = Request::get(&self.url(paths::HEALTH))
            .send()
            .await
            .map_err(network)?;
        decode(resp).await
    }
}
