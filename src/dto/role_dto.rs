use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(length(max = 256))]
    pub description: String,
    /// Permission codes such as `application:review`
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePermissionsRequest {
    pub permissions: Vec<String>,
}
