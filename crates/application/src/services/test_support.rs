//! 服务测试用的进程内仓库与探针实现

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use domain::{
    ConnectionRequest, Notification, Post, PostId, RepositoryError, RequestId, RequestStatus,
    User, UserId, UserSummary,
};
use uuid::Uuid;

use crate::{
    events::{EventEnvelope, EventPublisher, PublishError},
    media::{MediaError, MediaStore, MediaUpload},
    repository::{ConnectionRepository, NotificationRepository, PostRepository, UserRepository},
};

pub fn make_user(user_name: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::from(Uuid::new_v4()),
        first_name: user_name.to_owned(),
        last_name: "Tester".to_owned(),
        user_name: user_name.to_owned(),
        headline: None,
        profile_image: None,
        connections: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(users.into_iter().map(|user| (user.id, user)).collect()),
        })
    }

    pub fn connections_of(&self, id: UserId) -> Vec<UserId> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|user| user.connections.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn add_connection(&self, user: UserId, peer: UserId) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user).ok_or(RepositoryError::NotFound)?;
        user.add_connection(peer, Utc::now());
        Ok(())
    }

    async fn remove_connection(&self, user: UserId, peer: UserId) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(&user) {
            user.remove_connection(peer, Utc::now());
        }
        Ok(())
    }

    async fn find_summary(&self, id: UserId) -> Result<Option<UserSummary>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(&id).map(User::summary))
    }

    async fn find_summaries(&self, ids: &[UserId]) -> Result<Vec<UserSummary>, RepositoryError> {
        let users = self.users.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(User::summary))
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryConnectionRepository {
    requests: Mutex<Vec<ConnectionRequest>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn create(
        &self,
        request: ConnectionRequest,
    ) -> Result<ConnectionRequest, RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        // 模拟 (sender, receiver) WHERE status = 'pending' 的部分唯一索引
        let duplicate = requests.iter().any(|existing| {
            existing.sender == request.sender
                && existing.receiver == request.receiver
                && existing.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        requests.push(request.clone());
        Ok(request)
    }

    async fn update(
        &self,
        request: ConnectionRequest,
    ) -> Result<ConnectionRequest, RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        let slot = requests
            .iter_mut()
            .find(|existing| existing.id == request.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = request.clone();
        Ok(request)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|request| request.id == id)
            .cloned())
    }

    async fn find_pending(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|request| {
                request.sender == sender
                    && request.receiver == receiver
                    && request.status == RequestStatus::Pending
            })
            .cloned())
    }

    async fn find_pending_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|request| {
                request.status == RequestStatus::Pending
                    && ((request.sender == a && request.receiver == b)
                        || (request.sender == b && request.receiver == a))
            })
            .cloned())
    }

    async fn list_pending_for(
        &self,
        receiver: UserId,
    ) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| {
                request.receiver == receiver && request.status == RequestStatus::Pending
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, RepositoryError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepositoryError> {
        let mut posts = self.posts.lock().unwrap();
        let slot = posts
            .iter_mut()
            .find(|existing| existing.id == post.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, RepositoryError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn list_for(&self, receiver: UserId) -> Result<Vec<Notification>, RepositoryError> {
        let mut list: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|notification| notification.receiver == receiver)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn mark_all_read(&self, receiver: UserId) -> Result<u64, RepositoryError> {
        let mut count = 0;
        for notification in self.notifications.lock().unwrap().iter_mut() {
            if notification.receiver == receiver && !notification.is_read {
                notification.is_read = true;
                count += 1;
            }
        }
        Ok(count)
    }
}

/// 记录所有发布事件的探针发布器
#[derive(Default)]
pub struct RecordingPublisher {
    envelopes: Mutex<Vec<EventEnvelope>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.envelopes.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, envelope: EventEnvelope) -> Result<(), PublishError> {
        self.envelopes.lock().unwrap().push(envelope);
        Ok(())
    }
}

/// 固定返回 URL 的媒体存储
pub struct StubMediaStore;

#[async_trait]
impl MediaStore for StubMediaStore {
    async fn store(&self, upload: MediaUpload) -> Result<String, MediaError> {
        Ok(format!("https://media.test/{}", upload.filename))
    }
}

/// 永远失败的媒体存储，用于验证上传失败传播
pub struct FailingMediaStore;

#[async_trait]
impl MediaStore for FailingMediaStore {
    async fn store(&self, _upload: MediaUpload) -> Result<String, MediaError> {
        Err(MediaError::Upload("simulated outage".into()))
    }
}
