use domain::{ListQuery, Page, PublicMember, PublicMemberInput};

use super::Collection;
use crate::context::ApiContext;
use crate::error::ApiError;

pub const PUBLIC_MEMBERS: &str = "publicMembers/";

pub struct PublicMembersClient {
    members: Collection<PublicMember, PublicMemberInput>,
}

impl PublicMembersClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            members: Collection::new(ctx, PUBLIC_MEMBERS),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<PublicMember>, ApiError> {
        self.members.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<PublicMember, ApiError> {
        self.members.get(id).await
    }

    pub async fn create(&self, body: &PublicMemberInput) -> Result<PublicMember, ApiError> {
        self.members.create(body).await
    }

    pub async fn update(
        &self,
        id: i64,
        body: &PublicMemberInput,
    ) -> Result<PublicMember, ApiError> {
        self.members.update(id, body).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.members.delete(id).await
    }
}
