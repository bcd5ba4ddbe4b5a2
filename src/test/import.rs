#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    use crate::{
        app::import::{import_portfolio, read_assets, read_categories},
        db::SqliteStore,
        models::{CurrencyDomain, UnitPolicy},
    };

    const CATEGORIES: &str = "\
id,name,target_weight,currency_domain,unit_policy
fixed_income,Fixed income,40%,local,continuous
equities,Equities,0.35,local,discrete_local
stocks,Stocks,25 %,foreign,discrete_foreign
";

    const ASSETS: &str = "\
category_id,ticker,quantity,current_value,quoted_price,target_weight
fixed_income,TESOURO,,1500.50,,100%
equities,ITSA4,20,,10.5,0.5
equities,WEGE3,0,0,40,0.5
stocks,VNQ,1.5,,90,1
";

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_categories_with_percent_weights() {
        let file = csv_file(CATEGORIES);

        let categories = read_categories(file.path().to_str().unwrap()).unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(*categories[0].target_weight(), dec!(0.4));
        assert_eq!(*categories[0].unit_policy(), UnitPolicy::Continuous);
        assert_eq!(*categories[1].target_weight(), dec!(0.35));
        assert_eq!(*categories[2].target_weight(), dec!(0.25));
        assert_eq!(*categories[2].currency_domain(), CurrencyDomain::Foreign);
        assert_eq!(*categories[2].unit_policy(), UnitPolicy::DiscreteForeign);
    }

    #[test]
    fn derives_missing_values_from_quantity_and_price() {
        let categories_file = csv_file(CATEGORIES);
        let assets_file = csv_file(ASSETS);
        let categories = read_categories(categories_file.path().to_str().unwrap()).unwrap();

        let assets = read_assets(assets_file.path().to_str().unwrap(), &categories).unwrap();

        assert_eq!(assets.len(), 4);
        assert_eq!(*assets[0].current_quantity(), None);
        assert_eq!(*assets[0].current_value(), dec!(1500.50));
        assert_eq!(*assets[0].target_weight(), dec!(1));
        assert_eq!(*assets[1].current_value(), dec!(210));
        assert_eq!(*assets[3].current_value(), dec!(135));
        assert_eq!(*assets[3].quoted_price(), Some(dec!(90)));
    }

    #[test]
    fn rejects_unknown_category() {
        let categories_file = csv_file(CATEGORIES);
        let assets_file = csv_file(
            "category_id,ticker,quantity,current_value,quoted_price,target_weight\ncrypto,BTC,1,,100,1\n",
        );
        let categories = read_categories(categories_file.path().to_str().unwrap()).unwrap();

        let err = read_assets(assets_file.path().to_str().unwrap(), &categories).unwrap_err();

        assert!(err.to_string().contains("Unknown category 'crypto'"));
    }

    #[test]
    fn rejects_repeated_ticker_in_one_category() {
        let categories_file = csv_file(CATEGORIES);
        let assets_file = csv_file(
            "category_id,ticker,quantity,current_value,quoted_price,target_weight\n\
equities,ITSA4,20,,10.5,0.5\n\
stocks,ITSA4,1,,10,1\n\
equities,ITSA4,5,,10.5,0.5\n",
        );
        let categories = read_categories(categories_file.path().to_str().unwrap()).unwrap();

        let err = read_assets(assets_file.path().to_str().unwrap(), &categories).unwrap_err();

        assert!(
            err.to_string()
                .contains("Duplicate asset 'ITSA4' in category 'equities' at row 3")
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        let file = csv_file(
            "id,name,target_weight,currency_domain,unit_policy\nx,X,0.5,local,rounded\n",
        );

        assert!(read_categories(file.path().to_str().unwrap()).is_err());
    }

    #[tokio::test]
    async fn import_replaces_store_contents() {
        let categories_file = csv_file(CATEGORIES);
        let assets_file = csv_file(ASSETS);
        let store = SqliteStore::in_memory().await.unwrap();

        let summary = import_portfolio(
            &store,
            categories_file.path().to_str().unwrap(),
            assets_file.path().to_str().unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(*summary.categories(), 3);
        assert_eq!(*summary.assets(), 4);
        assert_eq!(store.assets().await.unwrap().len(), 4);

        let summary = import_portfolio(
            &store,
            categories_file.path().to_str().unwrap(),
            assets_file.path().to_str().unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(*summary.assets(), 4);
        assert_eq!(store.assets().await.unwrap().len(), 4);
    }
}
