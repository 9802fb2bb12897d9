//! Permission Definitions
//!
//! Capability table: every guarded action maps to the minimum [`Role`] that
//! may perform it. Roles are ranked, so `dev` inherits everything `admin`
//! can do.
//!
//! ## 设计原则
//! - 顾客 (无令牌) 只能浏览菜单、用 PIN 下单和查看自己的订单
//! - 员工负责开台、出餐、结账
//! - 管理员负责删除订单以及桌台/菜单维护

use shared::models::Role;

use super::CurrentUser;
use crate::security_log;
use crate::utils::AppError;

/// Guarded actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    // === 会话 ===
    OpenTable,
    CloseSession,
    MarkPaid,
    ListSessions,

    // === 订单 ===
    AdvanceOrderStatus,
    ViewAllOrders,
    DeleteOrder,

    // === 结账 ===
    CheckoutPreview,
    CheckoutFinalize,
    CheckoutHistory,

    // === 菜单 / 桌台 ===
    ToggleMenuVisibility,
    ViewHiddenMenu,
    ManageTables,
    ManageMenu,
}

impl Capability {
    /// Minimum role allowed to perform this action
    pub fn min_role(&self) -> Role {
        match self {
            Capability::OpenTable
            | Capability::CloseSession
            | Capability::MarkPaid
            | Capability::ListSessions
            | Capability::AdvanceOrderStatus
            | Capability::ViewAllOrders
            | Capability::CheckoutPreview
            | Capability::CheckoutFinalize
            | Capability::CheckoutHistory
            | Capability::ToggleMenuVisibility
            | Capability::ViewHiddenMenu => Role::Employee,
            Capability::DeleteOrder | Capability::ManageTables | Capability::ManageMenu => {
                Role::Admin
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::OpenTable => "sessions:open",
            Capability::CloseSession => "sessions:close",
            Capability::MarkPaid => "sessions:paid",
            Capability::ListSessions => "sessions:list",
            Capability::AdvanceOrderStatus => "orders:status",
            Capability::ViewAllOrders => "orders:list",
            Capability::DeleteOrder => "orders:delete",
            Capability::CheckoutPreview => "checkout:preview",
            Capability::CheckoutFinalize => "checkout:finalize",
            Capability::CheckoutHistory => "checkout:history",
            Capability::ToggleMenuVisibility => "menu:visibility",
            Capability::ViewHiddenMenu => "menu:hidden",
            Capability::ManageTables => "tables:manage",
            Capability::ManageMenu => "menu:manage",
        }
    }
}

/// Capability check failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} requires role {} or higher", .capability.as_str(), .capability.min_role())]
pub struct PermissionDenied {
    pub capability: Capability,
    pub role: Role,
}

impl From<PermissionDenied> for AppError {
    fn from(err: PermissionDenied) -> Self {
        AppError::Forbidden(err.to_string())
    }
}

impl CurrentUser {
    /// 检查是否拥有指定能力
    pub fn can(&self, capability: Capability) -> bool {
        self.role >= capability.min_role()
    }

    /// Fail with `Forbidden` unless the caller holds `capability`
    pub fn require(&self, capability: Capability) -> Result<(), PermissionDenied> {
        if self.can(capability) {
            return Ok(());
        }

        security_log!(
            "WARN",
            "forbidden",
            user = self.id.as_str(),
            role = self.role.as_str(),
            capability = capability.as_str()
        );
        Err(PermissionDenied {
            capability,
            role: self.role,
        })
    }
}
