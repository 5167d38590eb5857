use crate::task::{TaskPriority, TaskStatus};

/// Visual style of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeVariant {
    /// Solid primary style.
    Default,
    /// Muted style.
    Secondary,
    /// Outline only.
    Outline,
    /// Red / error style.
    Destructive,
    /// Amber style.
    Warning,
    /// Green style.
    Success,
}

impl BadgeVariant {
    /// Style token understood by front ends.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Secondary => "secondary",
            Self::Outline => "outline",
            Self::Destructive => "destructive",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

impl TaskPriority {
    /// Badge style for the priority chip.
    #[must_use]
    pub const fn badge(self) -> BadgeVariant {
        match self {
            Self::High => BadgeVariant::Destructive,
            Self::Medium => BadgeVariant::Warning,
            Self::Low => BadgeVariant::Secondary,
        }
    }
}

impl TaskStatus {
    /// Badge style for the status chip.
    #[must_use]
    pub const fn badge(self) -> BadgeVariant {
        match self {
            Self::Completed => BadgeVariant::Default,
            Self::InProgress => BadgeVariant::Secondary,
            Self::Pending => BadgeVariant::Outline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_badges() {
        assert_eq!(TaskPriority::High.badge(), BadgeVariant::Destructive);
        assert_eq!(TaskPriority::Medium.badge(), BadgeVariant::Warning);
        assert_eq!(TaskPriority::Low.badge(), BadgeVariant::Secondary);
    }

    #[test]
    fn status_badges() {
        assert_eq!(TaskStatus::Completed.badge(), BadgeVariant::Default);
        assert_eq!(TaskStatus::InProgress.badge(), BadgeVariant::Secondary);
        assert_eq!(TaskStatus::Pending.badge(), BadgeVariant::Outline);
        assert_eq!(TaskStatus::Pending.badge().as_str(), "outline");
    }
}
