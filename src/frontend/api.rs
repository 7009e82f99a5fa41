use crate::{
    common::{
        article::{ArticleView, CreateArticleParams, GetArticleParams, LikeArticleParams},
        comment::{
            CreateCommentParams, DbCommentView, DeleteCommentParams, DeleteCommentResult,
            GetRepliesParams, GetRootCommentsParams,
        },
        newtypes::{ArticleId, CommentId},
        notifications::DbNotification,
        user::{LoginResponse, LoginUserParams, RegisterUserParams},
        SuccessResponse, AUTH_COOKIE,
    },
    frontend::{
        error::{FrontendError, FrontendResult},
        thread::ThreadStore,
    },
};
use async_trait::async_trait;
use log::info;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    pub hostname: String,
    ssl: bool,
    auth: Option<String>,
}

impl ApiClient {
    pub fn new(hostname: String) -> Self {
        Self {
            client: Client::new(),
            hostname,
            ssl: false,
            auth: None,
        }
    }

    /// Login token sent with every following request.
    pub fn with_auth(mut self, jwt: String) -> Self {
        self.auth = Some(jwt);
        self
    }

    pub async fn register(&self, params: &RegisterUserParams) -> FrontendResult<LoginResponse> {
        self.post("/api/v1/account/register", Some(params)).await
    }

    pub async fn login(&self, params: &LoginUserParams) -> FrontendResult<LoginResponse> {
        self.post("/api/v1/account/login", Some(params)).await
    }

    pub async fn create_article(&self, params: &CreateArticleParams) -> FrontendResult<ArticleView> {
        self.post("/api/v1/article", Some(params)).await
    }

    pub async fn get_article(&self, id: ArticleId) -> FrontendResult<ArticleView> {
        self.get("/api/v1/article", Some(GetArticleParams { id }))
            .await
    }

    pub async fn like_article(&self, params: &LikeArticleParams) -> FrontendResult<SuccessResponse> {
        self.post("/api/v1/article/like", Some(params)).await
    }

    pub async fn create_comment(
        &self,
        params: &CreateCommentParams,
    ) -> FrontendResult<DbCommentView> {
        self.post("/api/v1/comment", Some(params)).await
    }

    pub async fn get_root_comments(
        &self,
        params: &GetRootCommentsParams,
    ) -> FrontendResult<Vec<DbCommentView>> {
        self.get("/api/v1/comment/list", Some(params)).await
    }

    pub async fn get_replies(
        &self,
        params: &GetRepliesParams,
    ) -> FrontendResult<Vec<DbCommentView>> {
        self.get("/api/v1/comment/replies", Some(params)).await
    }

    pub async fn delete_comment(&self, id: CommentId) -> FrontendResult<DeleteCommentResult> {
        self.send(
            Method::DELETE,
            "/api/v1/comment",
            Some(DeleteCommentParams { id }),
        )
        .await
    }

    pub async fn notifications_list(&self) -> FrontendResult<Vec<DbNotification>> {
        self.get("/api/v1/notifications/list", None::<()>).await
    }

    pub async fn notifications_count(&self) -> FrontendResult<i64> {
        self.get("/api/v1/notifications/count", None::<()>).await
    }

    async fn get<T, R>(&self, endpoint: &str, query: Option<R>) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        R: Serialize + Debug,
    {
        self.send(Method::GET, endpoint, query).await
    }

    async fn post<T, R>(&self, endpoint: &str, params: Option<R>) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        R: Serialize + Debug,
    {
        self.send(Method::POST, endpoint, params).await
    }

    async fn send<P, T>(&self, method: Method, path: &str, params: Option<P>) -> FrontendResult<T>
    where
        P: Serialize + Debug,
        T: for<'de> Deserialize<'de>,
    {
        let mut req = self
            .client
            .request(method.clone(), self.request_endpoint(path));
        req = if method == Method::GET {
            req.query(&params)
        } else {
            req.form(&params)
        };
        if let Some(auth) = &self.auth {
            req = req.header(AUTH_COOKIE, auth.as_str());
        }
        let res = req.send().await?;
        let status = res.status();
        let url = res.url().to_string();
        let text = res.text().await?;
        Self::response(status, text, &url)
    }

    fn response<T>(status: StatusCode, text: String, url: &str) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json = serde_json::from_str(&text).map_err(|e| {
            info!("Failed to deserialize api response: {e} from {text} on {url}");
            FrontendError::new(text.clone())
        })?;
        if status == StatusCode::OK {
            Ok(json)
        } else {
            info!("API error: {text} on {url} status {status}");
            Err(FrontendError::new(text))
        }
    }

    fn request_endpoint(&self, path: &str) -> String {
        let protocol = if self.ssl { "https" } else { "http" };
        format!("{protocol}://{}{path}", &self.hostname)
    }
}

#[async_trait]
impl ThreadStore for ApiClient {
    async fn replies(
        &self,
        parent_id: CommentId,
        skip: usize,
        limit: usize,
    ) -> FrontendResult<Vec<DbCommentView>> {
        self.get_replies(&GetRepliesParams {
            parent_id,
            skip: Some(skip),
            limit: Some(limit),
        })
        .await
    }

    async fn delete(&self, id: CommentId) -> FrontendResult<DeleteCommentResult> {
        self.delete_comment(id).await
    }
}
