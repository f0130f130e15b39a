pub mod device;
pub mod phone;
pub mod table;
pub mod template;

pub use device::DeviceMode;
pub use phone::{normalize_phone, strip_non_digits, CanonicalPhone};
pub use table::Table;
pub use template::{normalize_template_name, MessageTemplate, TemplateCatalog, TemplateName};
