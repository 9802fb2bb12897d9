//! 消息总线核心实现

use shared::message::Notification;
use tokio::sync::broadcast;

/// Default capacity of the broadcast channel
pub const DEFAULT_CAPACITY: usize = 1024;

/// Receiver of order notifications
///
/// Delivery is best effort. Implementations must not block and must not fail
/// the caller.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 消息总线 - 服务器到订阅者的广播通道
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<Notification>,
}

impl MessageBus {
    /// 创建默认容量的消息总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 发布消息到所有订阅者
    ///
    /// Returns the number of receivers reached; zero when nobody listens.
    pub fn publish(&self, notification: Notification) -> usize {
        let event = notification.event;
        match self.tx.send(notification) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(event = %event, "No subscribers for notification");
                0
            }
        }
    }

    /// 订阅服务器广播
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for MessageBus {
    fn notify(&self, notification: Notification) {
        self.publish(notification);
    }
}
