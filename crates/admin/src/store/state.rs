//! The admin state tree and the slice selectors that address it.

use crate::api::{Brand, Order, Product, UploadReceipt};

use super::resource::ResourceState;

/// Every server-backed resource the console tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub brands: ResourceState<Vec<Brand>>,
    pub brand_details: ResourceState<Brand>,
    /// Flag: brand created.
    pub brand_create: ResourceState<Brand>,
    /// Flag: brand updated.
    pub brand_update: ResourceState<bool>,
    /// Flag: brand deleted.
    pub brand_delete: ResourceState<bool>,
    pub orders: ResourceState<Vec<Order>>,
    pub products: ResourceState<Vec<Product>>,
    /// Flag: upload accepted.
    pub product_upload: ResourceState<UploadReceipt>,
}

impl AdminState {
    /// Drop the error of every slice. Returns whether anything changed.
    pub fn clear_errors(&mut self) -> bool {
        // Non-short-circuiting so every slice is visited
        self.brands.clear_error()
            | self.brand_details.clear_error()
            | self.brand_create.clear_error()
            | self.brand_update.clear_error()
            | self.brand_delete.clear_error()
            | self.orders.clear_error()
            | self.products.clear_error()
            | self.product_upload.clear_error()
    }
}

/// Addresses one slice of [`AdminState`].
pub trait Slice {
    /// Value held by the slice.
    type Data;
    /// Name used in logs and errors.
    const NAME: &'static str;

    fn select(state: &mut AdminState) -> &mut ResourceState<Self::Data>;
    fn view(state: &AdminState) -> &ResourceState<Self::Data>;
}

macro_rules! define_slice {
    ($(#[$meta:meta])* $marker:ident, $field:ident, $data:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl Slice for $marker {
            type Data = $data;
            const NAME: &'static str = stringify!($field);

            fn select(state: &mut AdminState) -> &mut ResourceState<Self::Data> {
                &mut state.$field
            }

            fn view(state: &AdminState) -> &ResourceState<Self::Data> {
                &state.$field
            }
        }
    };
}

define_slice!(
    /// Brand list.
    Brands, brands, Vec<Brand>
);
define_slice!(
    /// Single brand being viewed or edited.
    BrandDetails, brand_details, Brand
);
define_slice!(
    /// Brand creation.
    BrandCreate, brand_create, Brand
);
define_slice!(
    /// Brand update.
    BrandUpdate, brand_update, bool
);
define_slice!(
    /// Brand deletion.
    BrandDelete, brand_delete, bool
);
define_slice!(
    /// Order list.
    Orders, orders, Vec<Order>
);
define_slice!(
    /// Product list.
    Products, products, Vec<Product>
);
define_slice!(
    /// Bulk product upload.
    ProductUpload, product_upload, UploadReceipt
);
