//! Typed wrappers for the blog API routes.

use super::cancel::CancellationToken;
use super::client::ApiClient;
use super::envelope::ApiResult;
use super::transport::Transport;
use crate::model::auth::{AuthGrant, LoginRequest, RegisterRequest};
use crate::model::post::{Post, PostPayload};
use serde::de::IgnoredAny;
use crate::router::encode_segment;

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LIST_POSTS_PATH: &str = "/posts/all-posts";
pub const CREATE_POST_PATH: &str = "/posts/create-post";

pub fn get_post_path(id: &str) -> String {
    format!("/posts/get-post/{}", encode_segment(id))
}

pub fn update_post_path(id: &str) -> String {
    format!("/posts/update-post/{}", encode_segment(id))
}

pub fn delete_post_path(id: &str) -> String {
    format!("/posts/delete-post/{}", encode_segment(id))
}

impl<T: Transport> ApiClient<T> {
    pub fn register(
        &self,
        request: &RegisterRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<AuthGrant> {
        self.post(REGISTER_PATH, request, cancel)
    }

    pub fn login(&self, request: &LoginRequest, cancel: &CancellationToken) -> ApiResult<AuthGrant> {
        self.post(LOGIN_PATH, request, cancel)
    }

    /// `data` holds the page items, `total` the overall post count.
    pub fn list_posts(
        &self,
        offset: u64,
        limit: u32,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<Post>> {
        self.get(
            LIST_POSTS_PATH,
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
            cancel,
        )
    }

    pub fn get_post(&self, id: &str, cancel: &CancellationToken) -> ApiResult<Post> {
        self.get(&get_post_path(id), &[], cancel)
    }

    pub fn create_post(
        &self,
        payload: &PostPayload,
        cancel: &CancellationToken,
    ) -> ApiResult<IgnoredAny> {
        self.post(CREATE_POST_PATH, payload, cancel)
    }

    pub fn update_post(
        &self,
        id: &str,
        payload: &PostPayload,
        cancel: &CancellationToken,
    ) -> ApiResult<IgnoredAny> {
        self.put(&update_post_path(id), payload, cancel)
    }

    pub fn delete_post(&self, id: &str, cancel: &CancellationToken) -> ApiResult<IgnoredAny> {
        self.delete(&delete_post_path(id), cancel)
    }
}
