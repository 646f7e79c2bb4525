pub mod application {
    pub mod product {
        pub mod create;
        pub mod decrease_stock;
        pub mod delete;
        pub mod get_all;
        pub mod get_by_id;
        pub mod update;

        #[cfg(test)]
        mod test_support;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod product {
        pub mod dto;
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod value_objects;
        pub mod use_cases {
            pub mod create;
            pub mod decrease_stock;
            pub mod delete;
            pub mod get_all;
            pub mod get_by_id;
            pub mod update;
        }
    }
}
