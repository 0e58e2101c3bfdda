// Hand-written table declaration. The backup table is created and populated
// by an external ingestion pipeline, so there are no migrations to generate
// this from; column names follow the current schema revision.

diesel::table! {
    backup (id) {
        id -> BigInt,
        fecha -> Nullable<Text>,
        hora -> Nullable<Text>,
        titulo -> Nullable<Text>,
        editor -> Nullable<Text>,
        categoria -> Nullable<Text>,
        formato -> Nullable<Text>,
        version -> Nullable<Text>,
        yt -> Nullable<Text>,
        ig -> Nullable<Text>,
        tt -> Nullable<Text>,
        th -> Nullable<Text>,
        x -> Nullable<Text>,
        link -> Nullable<Text>,
    }
}
