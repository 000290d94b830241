mod sqlite_contact_store;
