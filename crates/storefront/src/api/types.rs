//! Request types for the remote API.

use serde::Serialize;
use yammi_core::ProductId;

/// A cart mutation or purchase mirrored to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// `POST /api/cart/add`
    Add { product_id: ProductId, quantity: u32 },
    /// `PUT /api/cart/item/{id}/increase`
    Increase(ProductId),
    /// `PUT /api/cart/item/{id}/decrease`
    Decrease(ProductId),
    /// `DELETE /api/cart/item/{id}`
    Remove(ProductId),
    /// `DELETE /api/cart/clear`
    Clear,
    /// `POST /api/purchase/direct`
    Purchase { product_id: ProductId, quantity: u32 },
}

/// HTTP method and path of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: reqwest::Method,
    pub path: String,
}

/// JSON body of add and purchase requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationBody {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl Mutation {
    /// Method and path for this mutation.
    #[must_use]
    pub fn route(&self) -> Route {
        use reqwest::Method;

        let (method, path) = match self {
            Self::Add { .. } => (Method::POST, "api/cart/add".to_string()),
            Self::Increase(id) => (Method::PUT, format!("api/cart/item/{id}/increase")),
            Self::Decrease(id) => (Method::PUT, format!("api/cart/item/{id}/decrease")),
            Self::Remove(id) => (Method::DELETE, format!("api/cart/item/{id}")),
            Self::Clear => (Method::DELETE, "api/cart/clear".to_string()),
            Self::Purchase { .. } => (Method::POST, "api/purchase/direct".to_string()),
        };

        Route { method, path }
    }

    /// Request body, if this mutation carries one.
    #[must_use]
    pub const fn body(&self) -> Option<MutationBody> {
        match *self {
            Self::Add {
                product_id,
                quantity,
            }
            | Self::Purchase {
                product_id,
                quantity,
            } => Some(MutationBody {
                product_id,
                quantity,
            }),
            _ => None,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add_to_cart",
            Self::Increase(_) => "increase_quantity",
            Self::Decrease(_) => "decrease_quantity",
            Self::Remove(_) => "remove_from_cart",
            Self::Clear => "clear_cart",
            Self::Purchase { .. } => "purchase_direct",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::Method;

    use super::*;

    #[test]
    fn test_routes() {
        let id = ProductId::new(12);
        let cases = [
            (
                Mutation::Add {
                    product_id: id,
                    quantity: 1,
                },
                Method::POST,
                "api/cart/add",
            ),
            (Mutation::Increase(id), Method::PUT, "api/cart/item/12/increase"),
            (Mutation::Decrease(id), Method::PUT, "api/cart/item/12/decrease"),
            (Mutation::Remove(id), Method::DELETE, "api/cart/item/12"),
            (Mutation::Clear, Method::DELETE, "api/cart/clear"),
            (
                Mutation::Purchase {
                    product_id: id,
                    quantity: 1,
                },
                Method::POST,
                "api/purchase/direct",
            ),
        ];

        for (mutation, method, path) in cases {
            let route = mutation.route();
            assert_eq!(route.method, method, "{}", mutation.name());
            assert_eq!(route.path, path, "{}", mutation.name());
        }
    }

    #[test]
    fn test_body_only_for_add_and_purchase() {
        let body = Mutation::Add {
            product_id: ProductId::new(3),
            quantity: 1,
        }
        .body()
        .unwrap();
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "productId": 3, "quantity": 1 })
        );

        assert!(Mutation::Increase(ProductId::new(3)).body().is_none());
        assert!(Mutation::Clear.body().is_none());
    }
}
