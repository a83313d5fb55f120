use serde::{Deserialize, Serialize};

use crate::value_objects::{PostId, Timestamp, UserId};

/// 帖子评论，按创建顺序追加
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub user: UserId,
    pub content: String,
    pub created_at: Timestamp,
}

/// 点赞切换的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Added,
    Removed,
}

/// 帖子实体
///
/// 帖子创建后不再发生状态转移，只有 likes / comments 两个字段被任意用户修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub description: String,
    /// 外部媒体主机返回的引用，原样存储
    pub image: Option<String>,
    pub likes: Vec<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: Timestamp,
}

impl Post {
    pub fn new(
        id: PostId,
        author: UserId,
        description: String,
        image: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            author,
            description,
            image,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
        }
    }

    /// 切换点赞：已点赞则取消，未点赞则添加。
    pub fn toggle_like(&mut self, user: UserId) -> LikeToggle {
        if let Some(pos) = self.likes.iter().position(|id| *id == user) {
            self.likes.remove(pos);
            LikeToggle::Removed
        } else {
            self.likes.push(user);
            LikeToggle::Added
        }
    }

    pub fn add_comment(&mut self, user: UserId, content: String, now: Timestamp) -> &Comment {
        self.comments.push(Comment {
            user,
            content,
            created_at: now,
        });
        self.comments.last().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn post(author: UserId) -> Post {
        Post::new(
            PostId::from(Uuid::new_v4()),
            author,
            "hello".into(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn toggle_like_round_trips() {
        let author = UserId::from(Uuid::new_v4());
        let liker = UserId::from(Uuid::new_v4());
        let mut p = post(author);

        assert_eq!(p.toggle_like(liker), LikeToggle::Added);
        assert_eq!(p.likes, vec![liker]);

        assert_eq!(p.toggle_like(liker), LikeToggle::Removed);
        assert!(p.likes.is_empty());
    }

    #[test]
    fn comments_preserve_order() {
        let author = UserId::from(Uuid::new_v4());
        let mut p = post(author);

        p.add_comment(author, "first".into(), Utc::now());
        p.add_comment(author, "second".into(), Utc::now());

        let contents: Vec<_> = p.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }
}
