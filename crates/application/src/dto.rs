use domain::{
    Comment, ConnectionRequest, Notification, NotificationKind, PostId, RelationState,
    RequestId, RequestStatus, Timestamp, UserId, UserSummary,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryDto {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub headline: Option<String>,
    pub profile_image: Option<String>,
}

impl From<&UserSummary> for UserSummaryDto {
    fn from(summary: &UserSummary) -> Self {
        Self {
            id: summary.id,
            first_name: summary.first_name.clone(),
            last_name: summary.last_name.clone(),
            user_name: summary.user_name.clone(),
            headline: summary.headline.clone(),
            profile_image: summary.profile_image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequestDto {
    pub id: RequestId,
    pub sender: UserId,
    pub receiver: UserId,
    pub status: RequestStatus,
    pub created_at: Timestamp,
}

impl From<&ConnectionRequest> for ConnectionRequestDto {
    fn from(request: &ConnectionRequest) -> Self {
        Self {
            id: request.id,
            sender: request.sender,
            receiver: request.receiver,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

/// 待处理请求 + 发送者身份投影
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestDto {
    pub id: RequestId,
    pub sender: UserSummaryDto,
    pub created_at: Timestamp,
}

/// 关系状态查询响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDto {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl From<&RelationState> for RelationDto {
    fn from(state: &RelationState) -> Self {
        Self {
            status: state.as_str().to_owned(),
            request_id: match state {
                RelationState::Received { request_id } => Some(*request_id),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub user: UserSummaryDto,
    pub content: String,
    pub created_at: Timestamp,
}

impl CommentDto {
    pub fn project(comment: &Comment, user: &UserSummary) -> Self {
        Self {
            user: UserSummaryDto::from(user),
            content: comment.content.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: PostId,
    pub author: UserSummaryDto,
    pub description: String,
    pub image: Option<String>,
    pub likes: Vec<UserId>,
    pub comments: Vec<CommentDto>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: domain::NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub related_user: UserSummaryDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_post: Option<PostId>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl NotificationDto {
    pub fn project(notification: &Notification, related_user: &UserSummary) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            related_user: UserSummaryDto::from(related_user),
            related_post: notification.related_post,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}
