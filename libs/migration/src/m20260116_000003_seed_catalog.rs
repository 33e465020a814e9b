use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            INSERT INTO categories (name, slug, description) VALUES
                ('Electronics', 'electronic', 'Smartphones, laptops, tablets and other electronics'),
                ('Clothing', 'clothing', 'Men''s, women''s and children''s clothing'),
                ('Shoes', 'shoes', 'Sneakers, loafers, boots and other footwear'),
                ('Books', 'books', 'Fiction and educational literature'),
                ('Home & Garden', 'garden', 'Household and gardening goods'),
                ('Beauty & Health', 'health', 'Cosmetics, perfume and health products'),
                ('Sports & Outdoors', 'sport', 'Sports equipment and outdoor gear')
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .await?;

        // Products reference categories by slug so ids stay whatever the sequence produced.
        db.execute_unprepared(
            r#"
            INSERT INTO products (name, price, category_id, in_stock, rating)
            SELECT seed.name, seed.price, c.id, seed.in_stock, seed.rating
            FROM (VALUES
                ('iPhone 15',      99999.99::numeric,  'electronic', true,  4.8::double precision),
                ('MacBook',        124999.99::numeric, 'electronic', true,  0.0::double precision),
                ('Jeans',          4999.99::numeric,   'clothing',   true,  0.0::double precision),
                ('War and Peace',  899.99::numeric,    'books',      true,  4.7::double precision),
                ('Treadmill',      45999.99::numeric,  'sport',      false, 4.3::double precision)
            ) AS seed(name, price, slug, in_stock, rating)
            JOIN categories c ON c.slug = seed.slug
            WHERE NOT EXISTS (SELECT 1 FROM products p WHERE p.name = seed.name)
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cascades to the seeded products
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM categories WHERE slug IN ('electronic', 'clothing', 'shoes', 'books', 'garden', 'health', 'sport')",
            )
            .await?;

        Ok(())
    }
}
