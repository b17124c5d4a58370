pub use crate::WidgetId;
pub use crate::animation::{Clock, Interpolate, ManualClock, SystemClock, signed_seconds};
pub use crate::color::{Color, HoverColors, HoverState};
pub use crate::error::{Error, Result};
pub use crate::geometry::{Rect, RoundCorners, Size, Thickness, Transform, Vec2};
pub use crate::input::{Key, KeyEvent, Modifiers, PointerEvent, ScrollDirection};
pub use crate::invalidate::{Dirty, Invalidation};
pub use crate::property::{BindingFlags, Property, SubscriptionId};
pub use crate::render_api::DrawingContext;
pub use crate::scene::{Scene, SceneNode};
pub use crate::scheduler::{AnimationHandle, FrameScheduler};
pub use crate::style::{Alignment, Style, Visibility};
pub use crate::theme::{Theme, VuSettings};
