use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{NewUser, RegisterRequest, RoleResponse, TokenRequest, TokenResponse},
        cart::{AddToCartRequest, CartLine, CartList, ClearCartResponse},
        catalog::{
            BannerList, CategoryList, CategoryRequest, CreateBannerRequest,
            UpdateBannerStatusRequest, UpdateCategoryRequest, UserList,
        },
        medicines::{CreateMedicineRequest, MedicineCount, MedicineList},
        orders::{
            Invoice, InvoiceLine, OrderLineRequest, OrderList, OrderWithItems,
            PaymentIntentResponse, PlaceOrderRequest, UpdatePaymentStatusRequest,
        },
        reports::{AdminStats, SalesLine, SalesReport, SellerStats},
    },
    models::{Banner, BannerStatus, CartItem, Category, Medicine, Order, OrderItem, OrderStatus, Role, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, catalog, health, medicines, orders, params, seller, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::health_check,
        auth::register,
        auth::issue_jwt,
        auth::user_role,
        medicines::list_medicines,
        medicines::count_medicines,
        medicines::get_medicine,
        medicines::create_medicine,
        cart::cart_list,
        cart::add_to_cart,
        cart::change_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::place_order,
        orders::get_invoice,
        orders::create_payment_intent,
        admin::admin_stats,
        admin::list_payments,
        admin::update_payment_status,
        admin::sales_report,
        users::list_users,
        users::update_user_role,
        users::user_payments,
        catalog::list_categories,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        catalog::list_banners,
        catalog::active_banners,
        catalog::create_banner,
        catalog::update_banner_status,
        seller::seller_stats,
        seller::seller_medicines,
        seller::seller_payments,
        seller::seller_advertisements
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            BannerStatus,
            User,
            Medicine,
            Category,
            CartItem,
            Order,
            OrderItem,
            Banner,
            NewUser,
            RegisterRequest,
            TokenRequest,
            TokenResponse,
            RoleResponse,
            CreateMedicineRequest,
            MedicineList,
            MedicineCount,
            AddToCartRequest,
            CartLine,
            CartList,
            ClearCartResponse,
            OrderLineRequest,
            PlaceOrderRequest,
            OrderWithItems,
            OrderList,
            InvoiceLine,
            Invoice,
            PaymentIntentResponse,
            UpdatePaymentStatusRequest,
            CategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateBannerRequest,
            UpdateBannerStatusRequest,
            BannerList,
            UserList,
            AdminStats,
            SellerStats,
            SalesLine,
            SalesReport,
            health::HealthData,
            params::MedicineSort,
            Meta,
            ApiResponse<Medicine>,
            ApiResponse<MedicineList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<SalesReport>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Auth", description = "Registration and tokens"),
        (name = "Medicines", description = "Medicine catalog"),
        (name = "Cart", description = "Shopping cart of the current user"),
        (name = "Orders", description = "Orders, invoices and payment intents"),
        (name = "Admin", description = "Admin dashboard"),
        (name = "Seller", description = "Seller dashboard"),
        (name = "User", description = "Buyer dashboard"),
        (name = "Categories", description = "Medicine categories"),
        (name = "Banners", description = "Advertisement requests"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
