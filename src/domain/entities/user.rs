use crate::domain::entities::document::OwnerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: OwnerId,
    pub email: String,
}
