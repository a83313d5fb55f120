use std::collections::HashMap;

use domain::{UserId, UserSummary};

mod connection_service;
mod notification_service;
mod post_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use connection_service::{ConnectionService, ConnectionServiceDependencies};
pub use notification_service::{NotificationService, NotificationServiceDependencies};
pub use post_service::{CreatePostRequest, PostService, PostServiceDependencies};

pub(crate) fn index_summaries(summaries: Vec<UserSummary>) -> HashMap<UserId, UserSummary> {
    summaries
        .into_iter()
        .map(|summary| (summary.id, summary))
        .collect()
}
